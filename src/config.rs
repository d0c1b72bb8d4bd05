//! Game configuration.

use std::time::Duration;

use crate::error::ConfigError;

/// Hard floor for a generated pool. A round with no power-ups is unplayable.
pub const MIN_POOL: u32 = 1;

/// Default countdown length of a round, in seconds.
pub const DEFAULT_ROUND_SECONDS: u32 = 60;

/// Default smallest pool drawn for a round.
pub const DEFAULT_POOL_MIN: u32 = 3;

/// Default largest pool drawn for a round.
pub const DEFAULT_POOL_MAX: u32 = 18;

/// Default number of entries kept on the leaderboard.
pub const DEFAULT_LEADERBOARD_CAPACITY: usize = 5;

/// Configuration for a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Seconds on the clock at the start of every round.
    pub round_seconds: u32,
    /// Smallest pool a round can draw (inclusive).
    pub pool_min: u32,
    /// Largest pool a round can draw (inclusive).
    pub pool_max: u32,
    /// Number of entries kept on the leaderboard.
    pub leaderboard_capacity: usize,
    /// Wall-clock length of one countdown step.
    pub tick: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_seconds: DEFAULT_ROUND_SECONDS,
            pool_min: DEFAULT_POOL_MIN,
            pool_max: DEFAULT_POOL_MAX,
            leaderboard_capacity: DEFAULT_LEADERBOARD_CAPACITY,
            tick: Duration::from_secs(1),
        }
    }
}

impl GameConfig {
    /// Check that the configuration describes a playable game.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_seconds == 0 {
            return Err(ConfigError::EmptyRound);
        }
        if self.pool_min < MIN_POOL {
            return Err(ConfigError::PoolBelowFloor { min: self.pool_min });
        }
        if self.pool_min > self.pool_max {
            return Err(ConfigError::InvertedPoolRange {
                min: self.pool_min,
                max: self.pool_max,
            });
        }
        if self.leaderboard_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.tick.is_zero() {
            return Err(ConfigError::ZeroTick);
        }
        Ok(())
    }
}
