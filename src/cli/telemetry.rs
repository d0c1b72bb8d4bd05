//! Tracing subscriber bootstrap.

use std::fs::{File, OpenOptions};
use std::sync::Mutex;

use squad::leaderboard::squad_data_dir;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "SQUAD_LOG";

/// Filter used when `SQUAD_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "warn";

/// Log file name inside the data directory.
const LOG_FILE: &str = "squad.log";

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogTarget {
    /// Standard error, for commands that print and exit.
    Stderr,
    /// `~/.squad/squad.log`, while the TUI owns the terminal.
    DataDir,
}

/// Install the global subscriber. Safe to call more than once.
pub(crate) fn init(target: LogTarget) {
    let filter = std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let _ = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::DataDir => {
            // The TUI owns the terminal; without a file there are no logs
            let Some(file) = open_log_file() else {
                return;
            };
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
}

fn open_log_file() -> Option<File> {
    let path = squad_data_dir().ok()?.join(LOG_FILE);
    OpenOptions::new().create(true).append(true).open(path).ok()
}
