//! CLI command implementations for squad.

pub(crate) mod play;
pub(crate) mod scores;
pub(crate) mod telemetry;

mod output;

use clap::ValueEnum;
use squad::{ConfigError, FileStore, StoreError};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Output format for the `scores` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ScoresFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(format!("leaderboard: {e}"))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(format!("invalid game settings: {e}"))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}

/// Open the leaderboard file at `path`, or at the default location.
fn open_store(path: Option<PathBuf>) -> Result<FileStore, CliError> {
    match path {
        Some(path) => Ok(FileStore::new(path)),
        None => Ok(FileStore::at_default_location()?),
    }
}
