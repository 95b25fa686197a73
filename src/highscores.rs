//! High score leaderboard
//!
//! Top 10 runs by score, saved when a run ends in game over or victory.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::persistence::{KeyValueStore, load_json, save_json};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    #[serde(rename = "date")]
    pub timestamp: f64,
    /// Seconds of play
    #[serde(rename = "time", default)]
    pub elapsed: f32,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "exBattle_highScores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a finished run. Returns the rank achieved (1-indexed), or None if
    /// it didn't make the table.
    pub fn add_score(&mut self, score: u64, level: u32, timestamp: f64, elapsed: f32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            level,
            timestamp,
            elapsed,
        };

        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut scores: Self = load_json(store, Self::STORAGE_KEY);
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        log::info!("Loaded {} high scores", scores.entries.len());
        scores
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Format a play time as `m:ss`
pub fn format_elapsed(seconds: f32) -> String {
    let total = seconds.max(0.0) as u32;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_keeps_top_ten_sorted() {
        let mut scores = HighScores::new();
        for s in 1..=15u64 {
            scores.add_score(s * 100, 1, 0.0, 10.0);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(1500));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(600));
        assert!(!scores.qualifies(500));
        assert_eq!(scores.potential_rank(1000), Some(7));
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(0, 1, 0.0, 0.0), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_persisted_as_plain_array() {
        let mut store = MemoryStore::new();
        let mut scores = HighScores::new();
        scores.add_score(300, 4, 1.0, 95.0);
        scores.save(&mut store).unwrap();
        let raw = store.get(HighScores::STORAGE_KEY).unwrap().unwrap_or_default();
        assert!(raw.starts_with('['));
        assert!(raw.contains("\"date\""));
        assert_eq!(HighScores::load(&store), scores);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(95.4), "1:35");
        assert_eq!(format_elapsed(-3.0), "0:00");
    }
}
