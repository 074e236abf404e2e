pub mod client;
pub mod config;
pub mod error;
pub mod game;
pub mod leaderboard;
pub mod protocol;
pub mod server;
pub mod utils;

pub use client::ClientChannel;
pub use game::GameEngine;
pub use server::{Server, ServerSession};
