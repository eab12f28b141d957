//! High score leaderboard
//!
//! Tracks the top 10 scores for the session, with optional JSON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score of the run
    pub score: u32,
    /// Difficulty level reached
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u32, level: u32, timestamp: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            level,
            timestamp,
        };

        // Find insertion point (sorted descending by score)
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

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load a leaderboard from a JSON file; a missing or unreadable file
    /// starts fresh
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    scores
                }
                Err(err) => {
                    log::warn!("Ignoring malformed high score file: {err}");
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save the leaderboard as JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_score_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn test_ranks_insert_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(50, 0, 0), Some(1));
        assert_eq!(scores.add_score(100, 1, 1), Some(1));
        assert_eq!(scores.add_score(75, 0, 2), Some(2));

        let listed: Vec<u32> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(listed, vec![100, 75, 50]);
        assert_eq!(scores.top_score(), Some(100));
    }

    #[test]
    fn test_leaderboard_caps_at_ten_entries() {
        let mut scores = HighScores::new();
        for i in 1..=12 {
            scores.add_score(i * 10, 0, i as u64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        // The two lowest entries fell off
        assert_eq!(scores.entries.last().map(|e| e.score), Some(30));
        assert!(!scores.qualifies(30));
        assert!(scores.qualifies(31));
    }

    #[test]
    fn test_save_load_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "space_flapper_scores_{}.json",
            std::process::id()
        ));

        let mut scores = HighScores::new();
        scores.add_score(120, 1, 1000);
        scores.add_score(80, 0, 2000);
        scores.save(&path).unwrap();

        let loaded = HighScores::load(&path);
        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded.top_score(), Some(120));
        assert_eq!(loaded.entries[1].level, 0);
        assert_eq!(loaded.entries[1].timestamp, 2000);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_or_malformed_file_starts_fresh() {
        let dir = std::env::temp_dir();
        let missing = dir.join(format!("space_flapper_missing_{}.json", std::process::id()));
        assert!(HighScores::load(&missing).is_empty());

        let malformed = dir.join(format!("space_flapper_bad_{}.json", std::process::id()));
        std::fs::write(&malformed, "not json").unwrap();
        assert!(HighScores::load(&malformed).is_empty());
        std::fs::remove_file(&malformed).unwrap();
    }

    #[test]
    fn test_potential_rank_matches_insertion() {
        let mut scores = HighScores::new();
        scores.add_score(100, 0, 0);
        scores.add_score(50, 0, 0);

        assert_eq!(scores.potential_rank(75), Some(2));
        assert_eq!(scores.potential_rank(200), Some(1));
        assert_eq!(scores.potential_rank(25), Some(3));
        assert_eq!(scores.potential_rank(0), None);
    }
}
