//! Scores commands - print or clear the leaderboard.

use super::output::{JsonLeaderboard, format_text};
use super::{CliError, ScoresFormat, open_store};
use squad::Leaderboard;
use squad::config::DEFAULT_LEADERBOARD_CAPACITY;
use std::path::PathBuf;

/// Execute the scores command.
///
/// # Errors
///
/// Returns an error if the leaderboard location cannot be determined.
pub(crate) fn execute(scores: Option<PathBuf>, format: ScoresFormat) -> Result<(), CliError> {
    let store = open_store(scores)?;
    let board = Leaderboard::load(store, DEFAULT_LEADERBOARD_CAPACITY);

    match format {
        ScoresFormat::Text => print!("{}", format_text(board.entries())),
        ScoresFormat::Json => {
            let json = JsonLeaderboard::from_entries(board.entries(), board.capacity());
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

/// Execute the clear-scores command.
///
/// # Errors
///
/// Returns an error if the leaderboard file cannot be removed.
pub(crate) fn clear(scores: Option<PathBuf>) -> Result<(), CliError> {
    let store = open_store(scores)?;
    let path = store.path().to_path_buf();

    let mut board = Leaderboard::load(store, DEFAULT_LEADERBOARD_CAPACITY);
    let dropped = board.entries().len();
    board.clear()?;

    println!("Cleared {dropped} entries from {}", path.display());
    Ok(())
}
