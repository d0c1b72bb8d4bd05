//! Error types for the squad game.
//!
//! Gameplay failures (a starved hero, an overcommitted pool, an expired
//! clock) are not errors: they are outcomes carried by the resolved phase.
//! The types here cover actions that have no meaning in the current phase,
//! invalid configuration and leaderboard storage.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::game::PhaseKind;

/// Errors returned when an action cannot be applied to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The action has no transition out of the current phase.
    NotAllowed {
        /// Name of the rejected action.
        action: &'static str,
        /// Phase the session was in.
        phase: PhaseKind,
    },
    /// An allocation adjustment named a hero that does not exist.
    UnknownActor(usize),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAllowed { action, phase } => {
                write!(f, "action `{action}` is not allowed while {phase}")
            }
            Self::UnknownActor(index) => write!(f, "no hero at index {index}"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Errors from validating a [`GameConfig`](crate::GameConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Rounds must last at least one second.
    EmptyRound,
    /// The smallest pool must contain at least one power-up.
    PoolBelowFloor {
        /// Configured minimum.
        min: u32,
    },
    /// The pool range is inverted.
    InvertedPoolRange {
        /// Configured minimum.
        min: u32,
        /// Configured maximum.
        max: u32,
    },
    /// The leaderboard must keep at least one entry.
    ZeroCapacity,
    /// The countdown period must be non-zero.
    ZeroTick,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRound => write!(f, "round length must be at least one second"),
            Self::PoolBelowFloor { min } => {
                write!(f, "minimum pool {min} is below the floor of 1 power-up")
            }
            Self::InvertedPoolRange { min, max } => write!(f, "pool range {min}..={max} is empty"),
            Self::ZeroCapacity => write!(f, "leaderboard capacity must be at least 1"),
            Self::ZeroTick => write!(f, "countdown period must be non-zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors from reading or writing the persisted leaderboard.
#[derive(Debug)]
pub enum StoreError {
    /// Neither `HOME` nor `USERPROFILE` is set.
    NoHomeDir,
    /// Filesystem access failed.
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoHomeDir => write!(f, "cannot determine home directory"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NoHomeDir => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_allowed_display() {
        let err = SessionError::NotAllowed {
            action: "submit",
            phase: PhaseKind::Idle,
        };
        assert_eq!(err.to_string(), "action `submit` is not allowed while idle");
    }

    #[test]
    fn test_store_error_source() {
        use std::error::Error;

        let err = StoreError::io("/tmp/x", io::Error::other("boom"));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("boom"));
        assert!(StoreError::NoHomeDir.source().is_none());
    }
}
