//! Search benchmarks.
//!
//! Run with: `cargo bench -p mcts`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use games_uttt::{State, CELL_COUNT};
use mcts::{MctsConfig, MctsSearch, UniformEvaluator};

fn bench_search_simulations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_simulations");

    for sims in [50u32, 200, 800] {
        group.throughput(Throughput::Elements(sims as u64));
        group.bench_with_input(BenchmarkId::new("uttt", sims), &sims, |b, &sims| {
            let root = State::new();
            b.iter(|| {
                let mut search = MctsSearch::new(
                    UniformEvaluator::new(CELL_COUNT, CELL_COUNT),
                    MctsConfig::default().with_simulations(sims),
                );
                search.move_probabilities(&root).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_search_positions(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_positions");

    let opening = State::new();
    let constrained = State::new().apply_move(40).unwrap();

    for (name, root) in [("opening", opening), ("constrained", constrained)] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut search = MctsSearch::new(
                    UniformEvaluator::new(CELL_COUNT, CELL_COUNT),
                    MctsConfig::for_testing(),
                );
                search.best_move(&root).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_warm_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_warm_cache");

    group.bench_function("requery", |b| {
        let root = State::new();
        let mut search = MctsSearch::new(
            UniformEvaluator::new(CELL_COUNT, CELL_COUNT),
            MctsConfig::for_testing(),
        );
        search.move_probabilities(&root).unwrap();
        b.iter(|| search.move_probabilities(&root).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_search_simulations,
    bench_search_positions,
    bench_warm_cache
);
criterion_main!(benches);
