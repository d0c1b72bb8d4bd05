//! Benchmarks for the session phase machine.
//!
//! Covers the per-action path a front end drives on every key press and
//! clock tick, plus a full mission through the controller.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use squad::game::{ACTOR_COUNT, Action, Round, Session, evaluate, score};
use squad::{Controller, GameConfig, MemoryStore};

fn bench_evaluate(c: &mut Criterion) {
    let allocations = [4, 5, 6];

    c.bench_function("evaluate_and_score", |b| {
        b.iter(|| {
            let verdict = evaluate(black_box(&allocations), black_box(15));
            let points = score(black_box(15), black_box(18), black_box(42));
            black_box((verdict, points))
        });
    });
}

fn bench_apply(c: &mut Criterion) {
    let config = GameConfig::default();
    let mut rng = StdRng::seed_from_u64(42);
    let start = Session::new();
    let intro = start
        .apply(Action::StartGame, || Round::generate(&mut rng, &config))
        .map(|t| t.session)
        .unwrap_or(start);
    let active = intro
        .apply(Action::StartMission, || Round::generate(&mut rng, &config))
        .map(|t| t.session)
        .unwrap_or(intro);

    c.bench_function("apply_adjust", |b| {
        b.iter(|| {
            let action = Action::Adjust {
                actor: black_box(1),
                delta: black_box(1),
            };
            black_box(active.apply(action, || Round::new(10, 60)))
        });
    });

    c.bench_function("apply_tick", |b| {
        b.iter(|| black_box(active.apply(black_box(Action::Tick), || Round::new(10, 60))));
    });
}

fn bench_mission(c: &mut Criterion) {
    let config = GameConfig::default();

    // Ten won levels then a starved round, through the controller
    c.bench_function("controller_mission_10_levels", |b| {
        b.iter(|| {
            let Ok(mut controller) =
                Controller::with_seed(config, MemoryStore::default(), black_box(7))
            else {
                return 0;
            };
            let _ = controller.start_game();
            let _ = controller.start_mission();
            for _ in 0..10 {
                for actor in 0..ACTOR_COUNT {
                    let _ = controller.adjust(actor, 1);
                }
                let _ = controller.submit();
                let _ = controller.next_level();
            }
            let _ = controller.submit();
            black_box(controller.session().cumulative_score())
        });
    });
}

criterion_group!(benches, bench_evaluate, bench_apply, bench_mission);
criterion_main!(benches);
