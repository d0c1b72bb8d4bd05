//! Game layer for squad.
//!
//! Implements the rules of a round on top of plain values:
//! - The fixed hero roster
//! - Round generation (random pool, zeroed allocations, full clock)
//! - Allocation verdicts and round scoring
//! - The session phase machine and its transition table
//! - Invariant checks used by tests and fuzzing

mod actor;
mod invariants;
mod round;
mod session;
mod verdict;

pub use actor::{ACTOR_COUNT, ACTORS, Actor, Allocations};
pub use invariants::{InvariantViolation, check_invariants};
pub use round::Round;
pub use session::{Action, Outcome, Phase, PhaseKind, Session, Transition};
pub use verdict::{FailReason, Verdict, evaluate, score};
