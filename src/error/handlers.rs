//! Error handlers
//!
//! Logs errors at a level matching their severity and decides which ones end a session.

use crate::error::types::GameServerError;
use log::{error, warn};

/// Log an error. Only transport and configuration failures are logged as errors.
pub fn handle_error(err: &GameServerError) {
    if is_session_fatal(err) {
        error!("{}", err);
    } else {
        warn!("{}", err);
    }
}

/// Whether the error ends the session or channel it occurred on.
///
/// Protocol, move and persistence errors are recoverable.
pub fn is_session_fatal(err: &GameServerError) -> bool {
    matches!(
        err,
        GameServerError::Transport(_) | GameServerError::Config(_)
    )
}
