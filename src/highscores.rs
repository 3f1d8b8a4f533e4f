//! Best-round leaderboard
//!
//! Top 10 round scores, highest first. Ties keep the older entry ahead.

use serde::{Deserialize, Serialize};

use crate::platform::{self, Slot};

pub const MAX_HIGH_SCORES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Invaders destroyed in the round
    pub score: u32,
    /// Unix timestamp (ms) when the round ended
    pub timestamp: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    const SLOT: Slot = Slot {
        local_storage_key: "tri_invaders_highscores",
        file_name: "highscores.json",
    };

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Index a score would be inserted at, or None if it misses the board.
    /// Zero never qualifies.
    fn slot_for(&self, score: u32) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let idx = self.entries.partition_point(|e| e.score >= score);
        (idx < MAX_HIGH_SCORES).then_some(idx)
    }

    /// Record a finished round. Returns its rank if it made the board.
    pub fn record(&mut self, score: u32, timestamp: f64) -> Option<usize> {
        let idx = self.slot_for(score)?;
        self.entries.insert(idx, HighScoreEntry { score, timestamp });
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(idx + 1)
    }

    pub fn load() -> Self {
        match platform::load_json::<Self>(Self::SLOT) {
            Some(mut scores) => {
                scores
                    .entries
                    .sort_by(|a, b| b.score.cmp(&a.score).then(a.timestamp.total_cmp(&b.timestamp)));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            None => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self) {
        match platform::save_json(Self::SLOT, self) {
            Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
            Err(e) => log::warn!("Failed to save high scores: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(0, 1.0), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_record_orders_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(5, 1.0), Some(1));
        assert_eq!(scores.record(9, 2.0), Some(1));
        assert_eq!(scores.record(7, 3.0), Some(2));
        // Tie goes behind the existing entry
        assert_eq!(scores.record(7, 4.0), Some(3));
        let order: Vec<u32> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![9, 7, 7, 5]);
        assert_eq!(scores.best(), Some(9));
    }

    #[test]
    fn test_board_is_capped() {
        let mut scores = HighScores::new();
        for s in 1..=MAX_HIGH_SCORES as u32 {
            scores.record(s * 10, s as f64);
        }
        assert_eq!(scores.record(5, 99.0), None);
        assert_eq!(scores.record(55, 99.0), Some(6));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(20));
    }
}
