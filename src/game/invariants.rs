//! Session invariants - sanity checks that detect bugs.
//!
//! The transition table should make every one of these impossible. They are
//! bug detectors for tests and fuzzing, not gameplay rules.

use crate::config::{GameConfig, MIN_POOL};
use crate::game::{FailReason, Phase, Session, Verdict, evaluate};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all session invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(session: &Session, config: &GameConfig) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut violation = |message: String| violations.push(InvariantViolation { message });

    if session.level() == 0 {
        violation("level dropped to 0".to_string());
    }

    if let Some(round) = session.phase().round() {
        if round.available_pool < MIN_POOL {
            violation(format!(
                "pool {} is below the floor of {MIN_POOL}",
                round.available_pool
            ));
        }
        if round.remaining_seconds > config.round_seconds {
            violation(format!(
                "clock {} exceeds round length {}",
                round.remaining_seconds, config.round_seconds
            ));
        }
    }

    match *session.phase() {
        Phase::Active(round) if round.is_expired() => {
            violation("round still active with no time left".to_string());
        }
        Phase::Won {
            round,
            total_allocated,
            ..
        } => {
            let verdict = evaluate(&round.allocations, round.available_pool);
            if verdict != (Verdict::Success { total_allocated }) {
                violation(format!("won round does not evaluate as a win: {verdict:?}"));
            }
        }
        Phase::Lost { round, reason } => {
            let consistent = match reason {
                FailReason::Starved => round.allocations.contains(&0),
                FailReason::Overcommitted { attempted, pool } => {
                    !round.allocations.contains(&0)
                        && attempted == round.total_allocated()
                        && pool == round.available_pool
                        && attempted > pool
                }
                FailReason::TimeExpired => round.is_expired(),
            };
            if !consistent {
                violation(format!("loss reason {reason:?} does not match {round:?}"));
            }
            if session.level() != 1 {
                violation(format!("level {} after a loss", session.level()));
            }
        }
        Phase::Idle => {
            if session.cumulative_score() != 0 || session.level() != 1 {
                violation("idle session carries progress".to_string());
            }
        }
        Phase::Intro | Phase::Active(_) => {}
    }

    violations
}
