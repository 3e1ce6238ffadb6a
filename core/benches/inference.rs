use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sweeper_core::sim::{SimConfig, SimulatedGame};
use sweeper_core::*;

/// Expert board after a handful of bot turns, or the fresh board when the bot lost early.
fn midgame_snapshot(seed: u64) -> BoardSnapshot {
    let game = SimulatedGame::new(SimConfig::expert(), seed).unwrap();
    let mut ctl =
        TurnController::start(game, SmallRng::seed_from_u64(seed), ControllerConfig::default())
            .unwrap();
    for _ in 0..20 {
        if ctl.step().unwrap().is_finished() {
            break;
        }
    }

    let size = ctl.geometry().field_size;
    let mut game = ctl.into_surface();
    BoardSnapshot::from_cells(size, game.capture_board().unwrap()).unwrap()
}

fn bench_decide(c: &mut Criterion) {
    let hidden = BoardSnapshot::from_cells(
        SimConfig::expert().size,
        SimConfig::expert()
            .size
            .positions()
            .map(|pos| (pos, CellSymbol::Hidden)),
    )
    .unwrap();
    let midgame = midgame_snapshot(7);
    let mut engine = InferenceEngine::new(SmallRng::seed_from_u64(0), Position::new(0, 16));

    c.bench_function("decide_first_move", |b| {
        b.iter(|| engine.decide(black_box(&hidden), 2))
    });
    c.bench_function("decide_midgame", |b| {
        b.iter(|| engine.decide(black_box(&midgame), 21))
    });
}

criterion_group!(benches, bench_decide);
criterion_main!(benches);
