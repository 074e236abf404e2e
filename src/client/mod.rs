//! Client side of the game connection
//!
//! The network channel to a server and the local mirror of its game.

pub mod channel;
pub mod mirror;

pub use channel::ClientChannel;
pub use mirror::{GameMirror, MoveIntent, PlayMode};
