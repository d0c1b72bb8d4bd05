//! Output formatting utilities for CLI.

use serde::Serialize;
use squad::LeaderboardEntry;

/// JSON-serializable leaderboard.
#[derive(Debug, Serialize)]
pub(super) struct JsonLeaderboard {
    /// Maximum number of entries kept.
    pub(super) capacity: usize,
    /// Entries, best first.
    pub(super) entries: Vec<JsonEntry>,
}

/// JSON-serializable leaderboard entry.
#[derive(Debug, Serialize)]
pub(super) struct JsonEntry {
    /// 1-based position.
    pub(super) rank: usize,
    /// Cumulative mission score.
    pub(super) score: u32,
    /// Level reached.
    pub(super) level: u32,
}

impl JsonLeaderboard {
    /// Create from ranked entries.
    pub(super) fn from_entries(entries: &[LeaderboardEntry], capacity: usize) -> Self {
        Self {
            capacity,
            entries: entries
                .iter()
                .enumerate()
                .map(|(i, entry)| JsonEntry {
                    rank: i + 1,
                    score: entry.score,
                    level: entry.level_reached,
                })
                .collect(),
        }
    }
}

/// One leaderboard row, as shown in the terminal.
pub(super) fn format_entry(rank: usize, entry: &LeaderboardEntry) -> String {
    format!(
        "#{rank}  Score: {:>6}  Level: {}",
        entry.score, entry.level_reached
    )
}

/// Format the leaderboard as human-readable text.
pub(super) fn format_text(entries: &[LeaderboardEntry]) -> String {
    let mut output = String::from("Leaderboard\n");

    if entries.is_empty() {
        output.push_str("  No missions recorded yet.\n");
        return output;
    }

    for (i, entry) in entries.iter().enumerate() {
        output.push_str("  ");
        output.push_str(&format_entry(i + 1, entry));
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_text() {
        let entries = [
            LeaderboardEntry {
                score: 1630,
                level_reached: 2,
            },
            LeaderboardEntry {
                score: 40,
                level_reached: 1,
            },
        ];
        let text = format_text(&entries);
        assert!(text.contains("#1  Score:   1630  Level: 2"));
        assert!(text.contains("#2  Score:     40  Level: 1"));
    }

    #[test]
    fn test_format_text_empty() {
        assert!(format_text(&[]).contains("No missions recorded yet."));
    }

    #[test]
    fn test_json_ranks() {
        let entries = [LeaderboardEntry {
            score: 7,
            level_reached: 3,
        }];
        let json = serde_json::to_string(&JsonLeaderboard::from_entries(&entries, 5)).unwrap();
        assert_eq!(
            json,
            r#"{"capacity":5,"entries":[{"rank":1,"score":7,"level":3}]}"#
        );
    }
}
