//! Benchmarks for round play and resolution.
//!
//! Run with: `cargo bench --bench round_resolution`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use reversus::ai::{decide, with_mandatory_value};
use reversus::core::{GameConfig, GameMode, GameState, PlayerId, StoryBattle};
use reversus::rules::round::finish_round_start;
use reversus::rules::{play_card, prepare_round, resolve_round};

/// A table where every seat has made its AI plays and the round is ready to score.
fn played_round(mode: GameMode, seed: u64) -> GameState {
    let mut state = GameState::new(mode, GameConfig::default().without_pacing(), seed);
    prepare_round(&mut state, true);
    finish_round_start(&mut state);

    let seats: Vec<PlayerId> = state.players.player_ids().collect();
    for seat in seats {
        let mut rng = state.rng.fork();
        let decision = with_mandatory_value(&state, seat, decide(&state, seat, &mut rng));
        let plays: Vec<_> = decision.plays().copied().collect();
        for play in plays {
            let _ = play_card(&mut state, seat, &play);
        }
    }
    state
}

const MODES: [(&str, GameMode); 3] = [
    ("solo4", GameMode::Solo { players: 4 }),
    ("duo", GameMode::Duo),
    ("necroverso", GameMode::Story(StoryBattle::NecroversoKing)),
];

fn benchmark_resolve_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resolve round");
    for (name, mode) in MODES {
        let state = played_round(mode, 42);
        group.bench_with_input(BenchmarkId::from_parameter(name), &state, |b, state| {
            b.iter_batched(
                || state.clone(),
                |mut state| black_box(resolve_round(&mut state)),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn benchmark_ai_decision(c: &mut Criterion) {
    let mut group = c.benchmark_group("AI decision");
    for (name, mode) in MODES {
        let mut state = GameState::new(mode, GameConfig::default().without_pacing(), 7);
        prepare_round(&mut state, true);
        finish_round_start(&mut state);
        let seat = PlayerId::new(1);
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut rng = state.rng.fork();
                black_box(decide(&state, seat, &mut rng))
            });
        });
    }
    group.finish();
}

fn benchmark_prepare_round(c: &mut Criterion) {
    let state = GameState::new(
        GameMode::Solo { players: 4 },
        GameConfig::default().without_pacing(),
        3,
    );
    c.bench_function("prepare_round/solo4", |b| {
        b.iter_batched(
            || state.clone(),
            |mut state| black_box(prepare_round(&mut state, true)),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    benchmark_resolve_round,
    benchmark_ai_decision,
    benchmark_prepare_round
);
criterion_main!(benches);
