#![no_main]

//! Session phase machine fuzzer.
//!
//! Feeds arbitrary action sequences through a controller and checks after
//! every step that:
//! 1. Session invariants hold
//! 2. Rejected actions leave the session untouched
//! 3. The clock is armed exactly while a round is active
//! 4. Every loss lands on the leaderboard

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use squad::game::{check_invariants, Action, PhaseKind};
use squad::{Controller, GameConfig, MemoryStore, Outcome};

/// A fuzzer-generated player (or clock) input.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzAction {
    StartGame,
    StartMission,
    IntroFinished,
    Adjust { actor: u8, delta: i8 },
    Submit,
    Tick,
    ResetLevel,
    NextLevel,
    Restart,
    NewMission,
}

impl From<FuzzAction> for Action {
    fn from(action: FuzzAction) -> Self {
        match action {
            FuzzAction::StartGame => Self::StartGame,
            FuzzAction::StartMission => Self::StartMission,
            FuzzAction::IntroFinished => Self::IntroFinished,
            FuzzAction::Adjust { actor, delta } => Self::Adjust {
                actor: usize::from(actor % 4),
                delta: i32::from(delta),
            },
            FuzzAction::Submit => Self::Submit,
            FuzzAction::Tick => Self::Tick,
            FuzzAction::ResetLevel => Self::ResetLevel,
            FuzzAction::NextLevel => Self::NextLevel,
            FuzzAction::Restart => Self::Restart,
            FuzzAction::NewMission => Self::NewMission,
        }
    }
}

/// Structured input for session fuzzing.
#[derive(Arbitrary, Debug)]
struct SessionInput {
    /// RNG seed for pool generation.
    seed: u64,
    /// Lower pool bound.
    pool_min: u8,
    /// Extra range above the lower bound.
    pool_span: u8,
    /// Seconds per round.
    round_seconds: u8,
    /// Actions to apply.
    actions: Vec<FuzzAction>,
}

fuzz_target!(|input: SessionInput| {
    let pool_min = u32::from(input.pool_min).max(1);
    let config = GameConfig {
        round_seconds: u32::from(input.round_seconds).max(1),
        pool_min,
        pool_max: pool_min + u32::from(input.pool_span),
        ..GameConfig::default()
    };

    let Ok(mut controller) = Controller::with_seed(config, MemoryStore::default(), input.seed)
    else {
        return;
    };

    let mut losses = 0usize;
    for action in input.actions.into_iter().take(500) {
        let before = *controller.session();
        match controller.dispatch(action.into()) {
            Ok(Outcome::Lost { .. }) => losses += 1,
            Ok(_) => {}
            Err(_) => assert_eq!(
                *controller.session(),
                before,
                "rejected {action:?} changed state"
            ),
        }

        let violations = check_invariants(controller.session(), &config);
        assert!(
            violations.is_empty(),
            "Invariants violated after {:?}: {:?}",
            action,
            violations
        );

        let active = controller.phase().kind() == PhaseKind::Active;
        assert_eq!(controller.countdown().is_armed(), active);

        let recorded = controller.leaderboard().entries().len();
        assert_eq!(recorded, losses.min(config.leaderboard_capacity));
    }
});
