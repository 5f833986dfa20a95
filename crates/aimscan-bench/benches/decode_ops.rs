//! Criterion micro-benchmarks for demo decoding and feature derivation.

use std::hint::black_box;

use aimscan_bench::{reference_match, stress_match};
use aimscan_demo::{derive_features, parse};
use criterion::{criterion_group, criterion_main, Criterion};

/// Benchmark: decode a one-minute demo end to end.
fn bench_decode_reference(c: &mut Criterion) {
    let bytes = reference_match(42).unwrap();

    c.bench_function("decode_reference_match", |b| {
        b.iter(|| {
            let replay = parse(bytes.as_slice()).unwrap();
            black_box(&replay);
        });
    });
}

/// Benchmark: decode a ten-minute demo with 12 enemies.
fn bench_decode_stress(c: &mut Criterion) {
    let bytes = stress_match(42).unwrap();

    let mut group = c.benchmark_group("decode_stress");
    group.sample_size(10);
    group.bench_function("decode_stress_match", |b| {
        b.iter(|| {
            let replay = parse(bytes.as_slice()).unwrap();
            black_box(&replay);
        });
    });
    group.finish();
}

/// Benchmark: feature derivation alone over the decoded recorder.
fn bench_derive_features(c: &mut Criterion) {
    let replay = parse(reference_match(42).unwrap().as_slice()).unwrap();
    let samples = replay.players()[0].samples().to_vec();

    c.bench_function("derive_features_3750", |b| {
        b.iter(|| {
            let mut s = samples.clone();
            derive_features(&mut s);
            black_box(&s);
        });
    });
}

criterion_group!(
    benches,
    bench_decode_reference,
    bench_decode_stress,
    bench_derive_features
);
criterion_main!(benches);
