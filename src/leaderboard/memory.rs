//! In-memory leaderboard
//!
//! Keeps win counts for the lifetime of the process.

use std::collections::HashMap;

use crate::error::PersistenceError;
use crate::leaderboard::{Leaderboard, ScoreEntry};

const MAX_NAME_LENGTH: usize = 32;

#[derive(Debug, Default)]
pub struct InMemoryLeaderboard {
    wins: HashMap<String, u32>,
}

impl InMemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }
}

fn validate_name(name: &str) -> Result<&str, PersistenceError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed.chars().count() > MAX_NAME_LENGTH
        || trimmed.contains(['\r', '\n', '\0'])
    {
        return Err(PersistenceError::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}

impl Leaderboard for InMemoryLeaderboard {
    fn record_win(&mut self, name: &str) -> Result<(), PersistenceError> {
        let name = validate_name(name)?;
        let count = self.wins.entry(name.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        Ok(())
    }

    fn top_scores(&self, limit: usize) -> Result<Vec<ScoreEntry>, PersistenceError> {
        let mut entries: Vec<ScoreEntry> = self
            .wins
            .iter()
            .map(|(name, wins)| ScoreEntry {
                name: name.clone(),
                wins: *wins,
            })
            .collect();

        entries.sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.name.cmp(&b.name)));
        entries.truncate(limit);
        Ok(entries)
    }
}
