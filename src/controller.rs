//! Game session controller.
//!
//! The [`Controller`] is the only owner of mutable game state. It holds the
//! current [`Session`] value, replaces it on every accepted action, keeps the
//! round clock in step with the phase, records lost missions on the
//! [`Leaderboard`] and tells subscribers what happened.
//!
//! Presentation (sound, video, animation) is not modelled here; a front end
//! subscribes with [`Controller::subscribe`] and reacts to [`Notice`]s.

mod countdown;

pub use countdown::Countdown;

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::error::{ConfigError, SessionError};
use crate::game::{Action, FailReason, Outcome, Phase, PhaseKind, Round, Session};
use crate::leaderboard::{Leaderboard, LeaderboardEntry, ScoreStore};

/// Notification sent to subscribers after a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The session moved to another phase.
    PhaseChanged {
        /// Phase before the action.
        from: PhaseKind,
        /// Phase after the action.
        to: PhaseKind,
    },
    /// A fresh round was installed.
    RoundStarted {
        /// Level of the new round.
        level: u32,
        /// Power-ups available.
        available_pool: u32,
    },
    /// A hero's allocation was adjusted.
    AllocationChanged {
        /// Hero index.
        actor: usize,
        /// New allocation.
        allocation: u32,
    },
    /// The clock advanced.
    Tick {
        /// Seconds left.
        remaining_seconds: u32,
    },
    /// The round was won.
    RoundWon {
        /// Points earned by the round.
        round_score: u32,
        /// Score accumulated so far.
        cumulative_score: u32,
    },
    /// The round was lost.
    RoundLost {
        /// Why.
        reason: FailReason,
    },
    /// The leaderboard changed.
    LeaderboardUpdated {
        /// New entries, best first.
        entries: Vec<LeaderboardEntry>,
    },
}

/// Drives a [`Session`] in response to player actions and the clock.
#[derive(Debug)]
pub struct Controller<S, R = StdRng> {
    config: GameConfig,
    session: Session,
    leaderboard: Leaderboard<S>,
    rng: R,
    countdown: Countdown,
    subscribers: Vec<Sender<Notice>>,
}

impl<S: ScoreStore> Controller<S, StdRng> {
    /// Create a controller with an entropy-seeded RNG.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: GameConfig, store: S) -> Result<Self, ConfigError> {
        Self::with_rng(config, store, StdRng::from_entropy())
    }

    /// Create a controller whose pools are reproducible from `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_seed(config: GameConfig, store: S, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, store, StdRng::seed_from_u64(seed))
    }
}

impl<S: ScoreStore, R: Rng> Controller<S, R> {
    /// Create a controller drawing pools from `rng`.
    ///
    /// The leaderboard is loaded from `store` immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_rng(config: GameConfig, store: S, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let leaderboard = Leaderboard::load(store, config.leaderboard_capacity);
        debug!(entries = leaderboard.entries().len(), "leaderboard loaded");

        Ok(Self {
            config,
            session: Session::new(),
            leaderboard,
            rng,
            countdown: Countdown::new(config.tick),
            subscribers: Vec::new(),
        })
    }

    /// Current session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &Phase {
        self.session.phase()
    }

    /// The leaderboard.
    #[must_use]
    pub const fn leaderboard(&self) -> &Leaderboard<S> {
        &self.leaderboard
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The round clock.
    #[must_use]
    pub const fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Receive a [`Notice`] for every subsequent state change.
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<Notice> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Leave the title screen.
    ///
    /// # Errors
    ///
    /// Returns an error unless the session is idle.
    pub fn start_game(&mut self) -> Result<Outcome, SessionError> {
        self.dispatch(Action::StartGame)
    }

    /// Skip the briefing and start the first round.
    ///
    /// # Errors
    ///
    /// Returns an error unless the briefing is showing.
    pub fn start_mission(&mut self) -> Result<Outcome, SessionError> {
        self.dispatch(Action::StartMission)
    }

    /// The briefing ended on its own.
    ///
    /// # Errors
    ///
    /// Returns an error unless the briefing is showing.
    pub fn intro_finished(&mut self) -> Result<Outcome, SessionError> {
        self.dispatch(Action::IntroFinished)
    }

    /// Change a hero's allocation by `delta`, never below zero.
    ///
    /// # Errors
    ///
    /// Returns an error unless a round is active, or if `actor` is not a hero.
    pub fn adjust(&mut self, actor: usize, delta: i32) -> Result<Outcome, SessionError> {
        self.dispatch(Action::Adjust { actor, delta })
    }

    /// Hand in the allocation.
    ///
    /// # Errors
    ///
    /// Returns an error unless a round is active.
    pub fn submit(&mut self) -> Result<Outcome, SessionError> {
        self.dispatch(Action::Submit)
    }

    /// Redraw the current round, keeping level and score.
    ///
    /// # Errors
    ///
    /// Returns an error unless a round is active.
    pub fn reset_level(&mut self) -> Result<Outcome, SessionError> {
        self.dispatch(Action::ResetLevel)
    }

    /// Continue to the next level after a win.
    ///
    /// # Errors
    ///
    /// Returns an error unless the last round was won.
    pub fn next_level(&mut self) -> Result<Outcome, SessionError> {
        self.dispatch(Action::NextLevel)
    }

    /// Start a brand-new mission after a win.
    ///
    /// # Errors
    ///
    /// Returns an error unless the last round was won.
    pub fn restart(&mut self) -> Result<Outcome, SessionError> {
        self.dispatch(Action::Restart)
    }

    /// Start a brand-new mission after a loss.
    ///
    /// # Errors
    ///
    /// Returns an error unless the last round was lost.
    pub fn new_mission(&mut self) -> Result<Outcome, SessionError> {
        self.dispatch(Action::NewMission)
    }

    /// Advance the clock by one step, independent of wall time.
    ///
    /// # Errors
    ///
    /// Returns an error unless a round is active.
    pub fn tick(&mut self) -> Result<Outcome, SessionError> {
        self.dispatch(Action::Tick)
    }

    /// Fire every clock tick that came due by `now`.
    ///
    /// Stops early if a tick ends the round. Returns the number of ticks
    /// applied.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let due = self.countdown.due_ticks(now);
        let mut fired = 0;
        for _ in 0..due {
            if !self.countdown.is_armed() || self.dispatch_at(Action::Tick, now).is_err() {
                break;
            }
            fired += 1;
        }
        fired
    }

    /// Apply an action at the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the action is not valid in the current phase.
    pub fn dispatch(&mut self, action: Action) -> Result<Outcome, SessionError> {
        self.dispatch_at(action, Instant::now())
    }

    fn dispatch_at(&mut self, action: Action, now: Instant) -> Result<Outcome, SessionError> {
        let config = &self.config;
        let rng = &mut self.rng;
        let transition = self
            .session
            .apply(action, || Round::generate(rng, config))
            .inspect_err(|e| debug!(error = %e, "action rejected"))?;

        let from = self.session.phase().kind();
        self.session = transition.session;
        let to = self.session.phase().kind();
        debug!(action = action.name(), %from, %to, "action applied");

        // The clock runs only while a round is active and restarts with every
        // freshly installed round.
        match transition.outcome {
            Outcome::RoundStarted => self.countdown.start(now),
            _ if to != PhaseKind::Active => self.countdown.cancel(),
            _ => {}
        }

        if from != to {
            self.publish(&Notice::PhaseChanged { from, to });
        }
        self.announce(transition.outcome);

        Ok(transition.outcome)
    }

    fn announce(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::IntroStarted => {}
            Outcome::RoundStarted => {
                let available_pool = self
                    .session
                    .phase()
                    .round()
                    .map_or(0, |round| round.available_pool);
                info!(level = self.session.level(), available_pool, "round started");
                self.publish(&Notice::RoundStarted {
                    level: self.session.level(),
                    available_pool,
                });
            }
            Outcome::AllocationChanged { actor, allocation } => {
                self.publish(&Notice::AllocationChanged { actor, allocation });
            }
            Outcome::Ticked { remaining_seconds } => {
                self.publish(&Notice::Tick { remaining_seconds });
            }
            Outcome::Won {
                total_allocated,
                round_score,
            } => {
                let cumulative_score = self.session.cumulative_score();
                info!(total_allocated, round_score, cumulative_score, "round won");
                self.publish(&Notice::RoundWon {
                    round_score,
                    cumulative_score,
                });
            }
            Outcome::Lost {
                reason,
                final_score,
                level_reached,
            } => {
                info!(?reason, final_score, level_reached, "round lost");
                self.publish(&Notice::RoundLost { reason });

                let entries = self
                    .leaderboard
                    .record(LeaderboardEntry {
                        score: final_score,
                        level_reached,
                    })
                    .to_vec();
                self.publish(&Notice::LeaderboardUpdated { entries });
            }
        }
    }

    fn publish(&mut self, notice: &Notice) {
        self.subscribers.retain(|tx| tx.send(notice.clone()).is_ok());
    }
}
