//! Session state and the phase transition table.
//!
//! A [`Session`] is a value: [`Session::apply`] never mutates it, it returns
//! the next session together with an [`Outcome`] describing what happened.
//! Every phase carries exactly the data that is meaningful in it, so a won
//! round cannot also have a failure reason and an idle session has no round.
//!
//! ```text
//! idle ─startGame─▶ intro ─startMission/introFinished─▶ active
//!                                                   │  ▲
//!            ┌──────────── submit (success) ────────┘  │ nextLevel, restart
//!            ▼                                         │
//!       resolved-win ──────────────────────────────────┘
//!
//! active ─submit (fail) / clock expiry─▶ resolved-loss ─newMission─▶ active
//! ```

use std::fmt;

use crate::error::SessionError;
use crate::game::{ACTOR_COUNT, FailReason, Round, Verdict, evaluate, score};

/// Current phase of a session, with the data that belongs to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Title screen, nothing started.
    Idle,
    /// Mission briefing before the first round.
    Intro,
    /// A round is being played.
    Active(Round),
    /// The last round was won.
    Won {
        /// The round as submitted.
        round: Round,
        /// Sum of the winning allocations.
        total_allocated: u32,
        /// Points earned by this round.
        round_score: u32,
    },
    /// The last round was lost.
    Lost {
        /// The round as it ended.
        round: Round,
        /// Why it was lost.
        reason: FailReason,
    },
}

impl Phase {
    /// The phase without its data.
    #[must_use]
    pub const fn kind(&self) -> PhaseKind {
        match self {
            Self::Idle => PhaseKind::Idle,
            Self::Intro => PhaseKind::Intro,
            Self::Active(_) => PhaseKind::Active,
            Self::Won { .. } => PhaseKind::ResolvedWin,
            Self::Lost { .. } => PhaseKind::ResolvedLoss,
        }
    }

    /// The round shown in this phase, if any.
    #[must_use]
    pub const fn round(&self) -> Option<&Round> {
        match self {
            Self::Idle | Self::Intro => None,
            Self::Active(round) | Self::Won { round, .. } | Self::Lost { round, .. } => Some(round),
        }
    }
}

/// Phase discriminant, used in errors and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// See [`Phase::Idle`].
    Idle,
    /// See [`Phase::Intro`].
    Intro,
    /// See [`Phase::Active`].
    Active,
    /// See [`Phase::Won`].
    ResolvedWin,
    /// See [`Phase::Lost`].
    ResolvedLoss,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Intro => "intro",
            Self::Active => "active",
            Self::ResolvedWin => "resolved-win",
            Self::ResolvedLoss => "resolved-loss",
        };
        f.write_str(name)
    }
}

/// Something the player (or the clock) asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the title screen.
    StartGame,
    /// Skip the briefing and start the first round.
    StartMission,
    /// The briefing ended on its own.
    IntroFinished,
    /// Change one hero's allocation.
    Adjust {
        /// Hero index into [`ACTORS`](crate::game::ACTORS).
        actor: usize,
        /// Units to add (negative to remove).
        delta: i32,
    },
    /// Hand the allocation in for judging.
    Submit,
    /// One second elapsed.
    Tick,
    /// Redraw the current round without touching level or score.
    ResetLevel,
    /// Continue after a win.
    NextLevel,
    /// Start over after a win.
    Restart,
    /// Start over after a loss.
    NewMission,
}

impl Action {
    /// Short name used in logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StartGame => "start_game",
            Self::StartMission => "start_mission",
            Self::IntroFinished => "intro_finished",
            Self::Adjust { .. } => "adjust",
            Self::Submit => "submit",
            Self::Tick => "tick",
            Self::ResetLevel => "reset_level",
            Self::NextLevel => "next_level",
            Self::Restart => "restart",
            Self::NewMission => "new_mission",
        }
    }
}

/// What an applied action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The briefing is showing.
    IntroStarted,
    /// A fresh round was installed.
    RoundStarted,
    /// A hero's allocation changed (or stayed at its floor).
    AllocationChanged {
        /// Hero index.
        actor: usize,
        /// New allocation for that hero.
        allocation: u32,
    },
    /// The clock advanced and the round goes on.
    Ticked {
        /// Seconds left.
        remaining_seconds: u32,
    },
    /// The round was won.
    Won {
        /// Sum of the winning allocations.
        total_allocated: u32,
        /// Points earned by this round.
        round_score: u32,
    },
    /// The round was lost and should be recorded on the leaderboard.
    Lost {
        /// Why it was lost.
        reason: FailReason,
        /// Cumulative score at the moment of the loss.
        final_score: u32,
        /// Level that was being played.
        level_reached: u32,
    },
}

/// A session after an action, plus what the action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The next session value.
    pub session: Session,
    /// What happened.
    pub outcome: Outcome,
}

/// The whole player experience across rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    phase: Phase,
    cumulative_score: u32,
    level: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session on the title screen, level 1, no score.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Idle,
            cumulative_score: 0,
            level: 1,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Score accumulated since the last new mission.
    #[must_use]
    pub const fn cumulative_score(&self) -> u32 {
        self.cumulative_score
    }

    /// Level being played (starts at 1).
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Player-facing message for a resolved round.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self.phase {
            Phase::Won {
                round,
                total_allocated,
                round_score,
            } => Some(format!(
                "Level {} complete! You allocated {total_allocated} out of {} power-ups. Score: {round_score}",
                self.level, round.available_pool
            )),
            Phase::Lost { reason, .. } => Some(reason.to_string()),
            Phase::Idle | Phase::Intro | Phase::Active(_) => None,
        }
    }

    /// Apply an action and return the resulting session.
    ///
    /// `fresh_round` is called only by transitions that install a new round.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotAllowed`] when the action has no transition
    /// from the current phase and [`SessionError::UnknownActor`] when an
    /// adjustment names a hero outside the roster. The session is unchanged
    /// in both cases.
    pub fn apply<F>(&self, action: Action, fresh_round: F) -> Result<Transition, SessionError>
    where
        F: FnOnce() -> Round,
    {
        let transition = match (self.phase, action) {
            (Phase::Idle, Action::StartGame) => Transition {
                session: Self {
                    phase: Phase::Intro,
                    ..*self
                },
                outcome: Outcome::IntroStarted,
            },

            (Phase::Intro, Action::StartMission | Action::IntroFinished)
            | (Phase::Active(_), Action::ResetLevel) => self.with_round(fresh_round(), self.level),

            (Phase::Active(round), Action::Adjust { actor, delta }) => {
                if actor >= ACTOR_COUNT {
                    return Err(SessionError::UnknownActor(actor));
                }
                let round = round.adjusted(actor, delta);
                Transition {
                    session: Self {
                        phase: Phase::Active(round),
                        ..*self
                    },
                    outcome: Outcome::AllocationChanged {
                        actor,
                        allocation: round.allocations[actor],
                    },
                }
            }

            (Phase::Active(round), Action::Tick) => {
                let round = round.ticked();
                if round.is_expired() {
                    self.lose(round, FailReason::TimeExpired)
                } else {
                    Transition {
                        session: Self {
                            phase: Phase::Active(round),
                            ..*self
                        },
                        outcome: Outcome::Ticked {
                            remaining_seconds: round.remaining_seconds,
                        },
                    }
                }
            }

            (Phase::Active(round), Action::Submit) => {
                match evaluate(&round.allocations, round.available_pool) {
                    Verdict::Success { total_allocated } => {
                        let round_score = score(
                            total_allocated,
                            round.available_pool,
                            round.remaining_seconds,
                        );
                        Transition {
                            session: Self {
                                phase: Phase::Won {
                                    round,
                                    total_allocated,
                                    round_score,
                                },
                                cumulative_score: self.cumulative_score.saturating_add(round_score),
                                level: self.level,
                            },
                            outcome: Outcome::Won {
                                total_allocated,
                                round_score,
                            },
                        }
                    }
                    Verdict::Fail(reason) => self.lose(round, reason),
                }
            }

            (Phase::Won { .. }, Action::NextLevel) => {
                self.with_round(fresh_round(), self.level.saturating_add(1))
            }

            (Phase::Won { .. }, Action::Restart) | (Phase::Lost { .. }, Action::NewMission) => {
                let mut transition = self.with_round(fresh_round(), 1);
                transition.session.cumulative_score = 0;
                transition
            }

            (phase, action) => {
                return Err(SessionError::NotAllowed {
                    action: action.name(),
                    phase: phase.kind(),
                });
            }
        };

        Ok(transition)
    }

    fn with_round(&self, round: Round, level: u32) -> Transition {
        Transition {
            session: Self {
                phase: Phase::Active(round),
                cumulative_score: self.cumulative_score,
                level,
            },
            outcome: Outcome::RoundStarted,
        }
    }

    /// Resolve the round as lost. The level drops back to 1; the score is
    /// kept until the player starts a new mission.
    fn lose(&self, round: Round, reason: FailReason) -> Transition {
        Transition {
            session: Self {
                phase: Phase::Lost { round, reason },
                cumulative_score: self.cumulative_score,
                level: 1,
            },
            outcome: Outcome::Lost {
                reason,
                final_score: self.cumulative_score,
                level_reached: self.level,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(pool: u32) -> Round {
        Round::new(pool, 60)
    }

    fn step(session: &Session, action: Action) -> Transition {
        session.apply(action, || round(10)).unwrap()
    }

    fn active(pool: u32) -> Session {
        let intro = step(&Session::new(), Action::StartGame).session;
        intro.apply(Action::StartMission, || round(pool)).unwrap().session
    }

    fn adjust(session: &Session, actor: usize, delta: i32) -> Session {
        step(session, Action::Adjust { actor, delta }).session
    }

    fn allocate(mut session: Session, allocations: [u32; 3]) -> Session {
        for (actor, &units) in allocations.iter().enumerate() {
            for _ in 0..units {
                session = adjust(&session, actor, 1);
            }
        }
        session
    }

    #[test]
    fn test_idle_to_active() {
        let session = Session::new();
        assert_eq!(session.phase().kind(), PhaseKind::Idle);

        let intro = step(&session, Action::StartGame);
        assert_eq!(intro.outcome, Outcome::IntroStarted);
        assert_eq!(intro.session.phase().kind(), PhaseKind::Intro);

        let started = intro
            .session
            .apply(Action::IntroFinished, || round(7))
            .unwrap();
        assert_eq!(started.outcome, Outcome::RoundStarted);
        assert_eq!(started.session.phase(), &Phase::Active(round(7)));
    }

    #[test]
    fn test_adjust_floor() {
        let session = active(10);
        let t = step(&session, Action::Adjust { actor: 1, delta: -1 });
        assert_eq!(
            t.outcome,
            Outcome::AllocationChanged {
                actor: 1,
                allocation: 0
            }
        );
    }

    #[test]
    fn test_adjust_unknown_actor() {
        let session = active(10);
        let err = session
            .apply(Action::Adjust { actor: 3, delta: 1 }, || round(1))
            .unwrap_err();
        assert_eq!(err, SessionError::UnknownActor(3));
    }

    #[test]
    fn test_submit_success_scores() {
        let mut session = allocate(active(10), [2, 3, 1]);
        for _ in 0..30 {
            session = step(&session, Action::Tick).session;
        }

        let t = step(&session, Action::Submit);
        assert_eq!(
            t.outcome,
            Outcome::Won {
                total_allocated: 6,
                round_score: 630
            }
        );
        assert_eq!(t.session.cumulative_score(), 630);
        assert_eq!(t.session.level(), 1);
        assert_eq!(
            t.session.message().unwrap(),
            "Level 1 complete! You allocated 6 out of 10 power-ups. Score: 630"
        );
    }

    #[test]
    fn test_next_level_keeps_score() {
        let won = step(&allocate(active(10), [1, 1, 1]), Action::Submit).session;
        let score = won.cumulative_score();

        let next = won.apply(Action::NextLevel, || round(4)).unwrap().session;
        assert_eq!(next.level(), 2);
        assert_eq!(next.cumulative_score(), score);
        assert_eq!(next.phase(), &Phase::Active(round(4)));
    }

    #[test]
    fn test_restart_after_win_clears() {
        let won = step(&allocate(active(10), [1, 1, 1]), Action::Submit).session;
        let won = step(&won, Action::NextLevel).session;
        let won = step(&allocate(won, [1, 1, 1]), Action::Submit).session;
        assert_eq!(won.level(), 2);

        let restarted = step(&won, Action::Restart).session;
        assert_eq!(restarted.level(), 1);
        assert_eq!(restarted.cumulative_score(), 0);
        assert_eq!(restarted.phase().kind(), PhaseKind::Active);
    }

    #[test]
    fn test_submit_starved_records_loss() {
        let won = step(&allocate(active(10), [1, 1, 1]), Action::Submit).session;
        let level_two = step(&won, Action::NextLevel).session;
        let session = allocate(level_two, [0, 3, 2]);

        let t = step(&session, Action::Submit);
        assert_eq!(
            t.outcome,
            Outcome::Lost {
                reason: FailReason::Starved,
                final_score: won.cumulative_score(),
                level_reached: 2,
            }
        );
        assert_eq!(t.session.level(), 1);
        assert_eq!(t.session.cumulative_score(), won.cumulative_score());
    }

    #[test]
    fn test_submit_overcommitted() {
        let session = allocate(active(10), [3, 4, 5]);
        let t = step(&session, Action::Submit);
        assert_eq!(
            t.session.phase(),
            &Phase::Lost {
                round: session.phase().round().copied().unwrap(),
                reason: FailReason::Overcommitted {
                    attempted: 12,
                    pool: 10
                },
            }
        );
    }

    #[test]
    fn test_clock_expiry_is_a_loss() {
        let mut session = allocate(active(10), [1, 1, 1]);
        for expected in (1..60).rev() {
            let t = step(&session, Action::Tick);
            assert_eq!(
                t.outcome,
                Outcome::Ticked {
                    remaining_seconds: expected
                }
            );
            session = t.session;
        }

        let t = step(&session, Action::Tick);
        assert!(matches!(
            t.outcome,
            Outcome::Lost {
                reason: FailReason::TimeExpired,
                ..
            }
        ));
        assert_eq!(t.session.phase().kind(), PhaseKind::ResolvedLoss);
        assert!(t.session.message().unwrap().starts_with("Time's up"));
    }

    #[test]
    fn test_new_mission_after_loss() {
        let won = step(&allocate(active(10), [1, 1, 1]), Action::Submit).session;
        let next = step(&won, Action::NextLevel).session;
        let lost = step(&next, Action::Submit).session;
        assert!(lost.cumulative_score() > 0);

        let fresh = step(&lost, Action::NewMission).session;
        assert_eq!(fresh.cumulative_score(), 0);
        assert_eq!(fresh.level(), 1);
        assert_eq!(fresh.phase(), &Phase::Active(round(10)));
    }

    #[test]
    fn test_reset_level_keeps_progress() {
        let won = step(&allocate(active(10), [1, 1, 1]), Action::Submit).session;
        let next = allocate(step(&won, Action::NextLevel).session, [2, 0, 0]);

        let reset = next.apply(Action::ResetLevel, || round(5)).unwrap().session;
        assert_eq!(reset.level(), 2);
        assert_eq!(reset.cumulative_score(), won.cumulative_score());
        assert_eq!(reset.phase(), &Phase::Active(round(5)));
    }

    #[test]
    fn test_not_allowed_leaves_session() {
        let session = Session::new();
        let err = session
            .apply(Action::Submit, || panic!("no round should be drawn"))
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::NotAllowed {
                action: "submit",
                phase: PhaseKind::Idle
            }
        );

        let lost = step(&active(10), Action::Submit).session;
        assert!(lost.apply(Action::Tick, || round(1)).is_err());
        assert!(lost.apply(Action::NextLevel, || round(1)).is_err());
        assert!(lost.apply(Action::Restart, || round(1)).is_err());
    }
}
