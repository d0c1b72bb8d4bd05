// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Squad: a resource-allocation game about starvation and deadlock.
//!
//! Three heroes compete for a random pool of power-ups. The player hands the
//! pool out before the clock runs down; the round is won only if every hero
//! gets at least one power-up and the total fits in the pool.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Front end (TUI, tests, fuzzing)   │
//! ├─────────────────────────────────────┤
//! │   Controller (clock, notices)       │──▶ Leaderboard ──▶ ScoreStore
//! ├─────────────────────────────────────┤
//! │   Session phase machine             │
//! ├─────────────────────────────────────┤
//! │   Round generation, verdict, score  │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod leaderboard;

pub use config::GameConfig;
pub use error::{ConfigError, SessionError, StoreError};

// Re-export key game types at crate root for convenience
pub use controller::{Controller, Notice};
pub use game::{Action, FailReason, Outcome, Phase, PhaseKind, Round, Session, Verdict};
pub use leaderboard::{FileStore, Leaderboard, LeaderboardEntry, MemoryStore, ScoreStore};
