//! Judging a submitted allocation and scoring a won round.

use std::fmt;

use crate::game::Allocations;

/// Points awarded for allocating the entire pool.
const EFFICIENCY_POINTS: u64 = 1000;

/// Why a round was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailReason {
    /// At least one hero received no power-ups.
    Starved,
    /// More power-ups were handed out than the pool holds.
    Overcommitted {
        /// Total the player tried to hand out.
        attempted: u32,
        /// Power-ups available in the round.
        pool: u32,
    },
    /// The clock ran out before the player submitted.
    TimeExpired,
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Starved => {
                write!(f, "Mission failed! All heroes must have at least one power-up!")
            }
            Self::Overcommitted { attempted, pool } => write!(
                f,
                "Deadlock formed! You allocated {attempted} power-ups, but only {pool} were available."
            ),
            Self::TimeExpired => write!(f, "Time's up! The squad could not be powered up in time."),
        }
    }
}

/// Result of evaluating an allocation against a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every hero has power-ups and the pool covers them all.
    Success {
        /// Sum of all allocations.
        total_allocated: u32,
    },
    /// The allocation breaks a rule.
    Fail(FailReason),
}

/// Judge an allocation.
///
/// The starvation check runs first and wins over over-allocation: an
/// allocation that both leaves a hero empty and exceeds the pool is
/// [`FailReason::Starved`].
#[must_use]
pub fn evaluate(allocations: &Allocations, available_pool: u32) -> Verdict {
    if allocations.contains(&0) {
        return Verdict::Fail(FailReason::Starved);
    }

    let total = allocations
        .iter()
        .fold(0u32, |sum, &units| sum.saturating_add(units));
    if total > available_pool {
        return Verdict::Fail(FailReason::Overcommitted {
            attempted: total,
            pool: available_pool,
        });
    }

    Verdict::Success {
        total_allocated: total,
    }
}

/// Score a won round.
///
/// `round(total / pool * 1000 + remaining_seconds)`, computed on the exact
/// fraction with halves rounded up.
#[must_use]
pub fn score(total_allocated: u32, available_pool: u32, remaining_seconds: u32) -> u32 {
    let time_bonus = u64::from(remaining_seconds);
    if available_pool == 0 {
        return u32::try_from(time_bonus).unwrap_or(u32::MAX);
    }

    let numerator = u64::from(total_allocated) * EFFICIENCY_POINTS;
    let pool = u64::from(available_pool);
    let mut efficiency = numerator / pool;
    if 2 * (numerator % pool) >= pool {
        efficiency += 1;
    }

    u32::try_from(efficiency + time_bonus).unwrap_or(u32::MAX)
}
