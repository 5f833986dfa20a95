//! Criterion micro-benchmarks for rule evaluation and analysis.

use std::hint::black_box;

use aimscan_bench::reference_player;
use aimscan_engine::{Analyzer, AnalyzerConfig};
use aimscan_rules::Rule;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

/// Benchmark: each rule on its own over one decoded player.
fn bench_rules(c: &mut Criterion) {
    let player = reference_player(42).unwrap();
    let samples = player.samples();

    let mut group = c.benchmark_group("rule");
    for rule in Rule::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(rule), &rule, |b, rule| {
            b.iter(|| black_box(rule.evaluate(samples)));
        });
    }
    group.finish();
}

/// Benchmark: full analysis of eight players, sequential vs. pooled.
fn bench_analyze_players(c: &mut Criterion) {
    let players: Vec<_> = (0..8).map(|seed| reference_player(seed).unwrap()).collect();

    let mut group = c.benchmark_group("analyze_players_8");
    for workers in [1usize, 4] {
        let mut analyzer = Analyzer::new(AnalyzerConfig {
            worker_count: Some(workers),
            ..AnalyzerConfig::default()
        })
        .unwrap();
        group.bench_function(BenchmarkId::from_parameter(workers), |b| {
            b.iter(|| black_box(analyzer.analyze_players(&players).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rules, bench_analyze_players);
criterion_main!(benches);
