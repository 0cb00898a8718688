//! Planner benchmarks for conquest_core.
//!
//! Run with: `cargo bench -p conquest_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use std::collections::BTreeSet;

use conquest_core::prelude::*;
use conquest_test_utils::fixtures::{late_game, mid_game};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Cluster decomposition of the whole board and of a scattered half.
pub fn cluster_benchmark(c: &mut Criterion) {
    let graph = TerritoryGraph::earth();
    let all: BTreeSet<TerritoryId> = (0..42).collect();
    let scattered: BTreeSet<TerritoryId> = (0..42).step_by(2).collect();

    c.bench_function("build_clusters/full_board", |b| {
        b.iter(|| build_clusters(&graph, black_box(&all)))
    });
    c.bench_function("build_clusters/scattered", |b| {
        b.iter(|| build_clusters(&graph, black_box(&scattered)))
    });
}

/// Full four-phase plan generation.
pub fn planner_benchmark(c: &mut Criterion) {
    let graph = TerritoryGraph::earth();
    let config = AgentConfig::default();

    let mid = mid_game();
    let mid_board = Board::new(&graph, &mid).unwrap();
    c.bench_function("generate_priority_clusters/mid_game", |b| {
        b.iter(|| generate_priority_clusters(&mid_board, &config, black_box(8)))
    });

    let late = late_game();
    let late_board = Board::new(&graph, &late).unwrap();
    c.bench_function("generate_priority_clusters/late_game", |b| {
        b.iter(|| generate_priority_clusters(&late_board, &config, black_box(10)))
    });

    c.bench_function("distribute_troops/mid_game", |b| {
        b.iter(|| {
            let mut planner = TurnPlanner::new();
            let mut priority = ContinentPriority::new(&graph);
            distribute_troops(&mut planner, &mut priority, &mid_board, &config)
        })
    });
}

criterion_group!(benches, cluster_benchmark, planner_benchmark);
criterion_main!(benches);
