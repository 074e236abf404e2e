//! Error handling
//!
//! Defines error types and handling for the game server and client.

pub mod handlers;
pub mod types;

pub use handlers::{handle_error, is_session_fatal};
pub use types::*;
