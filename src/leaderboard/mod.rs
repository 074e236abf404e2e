//! Leaderboard
//!
//! Records wins by player name. The game core never calls this; the client
//! does, after it sees the human win an online game.

pub mod memory;

pub use memory::InMemoryLeaderboard;

use crate::error::PersistenceError;

/// A player and their number of wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub wins: u32,
}

/// Storage for win counts.
pub trait Leaderboard {
    /// Adds one win for `name`, creating the entry if needed.
    fn record_win(&mut self, name: &str) -> Result<(), PersistenceError>;

    /// Up to `limit` entries, most wins first, ties by name.
    fn top_scores(&self, limit: usize) -> Result<Vec<ScoreEntry>, PersistenceError>;
}
