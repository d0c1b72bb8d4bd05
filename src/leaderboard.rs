//! Top-N leaderboard of finished missions.
//!
//! The leaderboard is a leaf: it knows nothing about sessions or rounds,
//! only about `(score, level)` entries, their order and where they are kept.
//! Entries are appended on every lost round, sorted by descending score and
//! truncated to the configured capacity, then written back to the store.

mod store;

pub use store::{FileStore, MemoryStore, ScoreStore, default_scores_path, squad_data_dir};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::StoreError;

/// A finished mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Cumulative score when the mission ended.
    pub score: u32,
    /// Level being played when the mission ended.
    #[serde(rename = "level")]
    pub level_reached: u32,
}

/// Ordered, bounded list of best missions backed by a [`ScoreStore`].
#[derive(Debug)]
pub struct Leaderboard<S> {
    store: S,
    entries: Vec<LeaderboardEntry>,
    capacity: usize,
}

impl<S: ScoreStore> Leaderboard<S> {
    /// Load the leaderboard from `store`.
    ///
    /// Missing, unreadable or malformed data yields an empty leaderboard.
    /// Data that parses but is out of order or too long is re-ranked.
    pub fn load(store: S, capacity: usize) -> Self {
        let entries = match store.load() {
            Ok(Some(blob)) => parse_entries(&blob, capacity).unwrap_or_else(|e| {
                warn!(error = %e, "discarding malformed leaderboard data");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "could not read leaderboard, starting empty");
                Vec::new()
            }
        };

        Self {
            store,
            entries,
            capacity,
        }
    }

    /// Entries, best first.
    #[must_use]
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Maximum number of entries kept.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// The backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Add an entry, re-rank, persist, and return the new list.
    ///
    /// A failed write is logged; the in-memory list is updated regardless.
    pub fn record(&mut self, entry: LeaderboardEntry) -> &[LeaderboardEntry] {
        self.entries.push(entry);
        rank(&mut self.entries, self.capacity);

        match serde_json::to_string(&self.entries) {
            Ok(blob) => match self.store.save(&blob) {
                Ok(()) => info!(
                    score = entry.score,
                    level = entry.level_reached,
                    entries = self.entries.len(),
                    "leaderboard updated"
                ),
                Err(e) => warn!(error = %e, "could not persist leaderboard"),
            },
            Err(e) => warn!(error = %e, "could not encode leaderboard"),
        }

        &self.entries
    }

    /// Drop every entry, in memory and in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be cleared.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        self.store.clear()
    }
}

/// Decode a persisted blob into ranked entries.
///
/// # Errors
///
/// Returns the JSON error if the blob is not an array of entries.
pub fn parse_entries(
    blob: &str,
    capacity: usize,
) -> Result<Vec<LeaderboardEntry>, serde_json::Error> {
    let mut entries: Vec<LeaderboardEntry> = serde_json::from_str(blob)?;
    rank(&mut entries, capacity);
    Ok(entries)
}

/// Sort by descending score (stable, so earlier entries win ties) and cut.
fn rank(entries: &mut Vec<LeaderboardEntry>, capacity: usize) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(capacity);
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn entry(score: u32, level_reached: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            score,
            level_reached,
        }
    }

    #[test]
    fn test_record_from_empty() {
        let mut board = Leaderboard::load(MemoryStore::default(), 5);
        assert!(board.entries().is_empty());

        let entries = board.record(entry(120, 1));
        assert_eq!(entries, &[entry(120, 1)]);
        assert_eq!(
            board.store().contents().as_deref(),
            Some(r#"[{"score":120,"level":1}]"#)
        );
    }

    #[test]
    fn test_record_keeps_order_and_capacity() {
        let mut board = Leaderboard::load(MemoryStore::default(), 5);
        for score in [300, 100, 700, 500, 200, 600, 400] {
            board.record(entry(score, 1));
        }

        let scores: Vec<u32> = board.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, [700, 600, 500, 400, 300]);
    }

    #[test]
    fn test_ties_keep_older_first() {
        let mut board = Leaderboard::load(MemoryStore::default(), 3);
        board.record(entry(500, 1));
        board.record(entry(500, 2));
        board.record(entry(500, 3));
        board.record(entry(500, 4));

        assert_eq!(board.entries(), &[entry(500, 1), entry(500, 2), entry(500, 3)]);
    }

    #[test]
    fn test_load_reads_level_field() {
        let store =
            MemoryStore::with_contents(r#"[{"score":1630,"level":2},{"score":40,"level":1}]"#);
        let board = Leaderboard::load(store, 5);
        assert_eq!(board.entries(), &[entry(1630, 2), entry(40, 1)]);
    }

    #[test]
    fn test_load_reranks_unsorted_data() {
        let store = MemoryStore::with_contents(
            r#"[{"score":1,"level":1},{"score":9,"level":1},{"score":5,"level":1}]"#,
        );
        let board = Leaderboard::load(store, 2);
        assert_eq!(board.entries(), &[entry(9, 1), entry(5, 1)]);
    }

    #[test]
    fn test_malformed_data_is_empty() {
        for blob in ["", "not json", "{}", r#"[{"score":-5,"level":1}]"#, r#"[{"points":3}]"#] {
            let board = Leaderboard::load(MemoryStore::with_contents(blob), 5);
            assert!(board.entries().is_empty(), "blob {blob:?} should be discarded");
        }
    }

    #[test]
    fn test_clear() {
        let mut board = Leaderboard::load(MemoryStore::default(), 5);
        board.record(entry(10, 1));
        board.clear().unwrap();
        assert!(board.entries().is_empty());
        assert_eq!(board.store().contents(), None);
    }
}
