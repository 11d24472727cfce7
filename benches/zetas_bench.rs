//! Twiddle Table Benchmarks
//!
//! Micro-benchmarks for Montgomery reduction, table generation, the
//! brute-force cross-check and table comparison across parameter presets.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use zetascope::compare::compare_tables;
use zetascope::ntt::{
    generate_zetas, montgomery_reduce, reference_table, verify_table, ALL_PARAMS, KYBER_256,
};
use zetascope::task::CancelToken;

fn bench_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

// ============================================================================
// Reduction Benchmarks
// ============================================================================

/// Benchmark a batch of reductions over accumulators in the valid range
fn bench_montgomery_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("montgomery_reduce");
    let mut rng = bench_rng();
    let bound = (KYBER_256.q as i32) << 15;
    let inputs: Vec<i32> = (0..1024).map(|_| rng.gen_range(-bound..bound)).collect();

    group.throughput(Throughput::Elements(inputs.len() as u64));
    group.bench_function("kyber_1024", |bench| {
        bench.iter(|| {
            inputs
                .iter()
                .map(|&a| montgomery_reduce(black_box(a), &KYBER_256).map(i32::from))
                .sum::<Result<i32, _>>()
        })
    });

    group.finish();
}

// ============================================================================
// Table Benchmarks
// ============================================================================

/// Benchmark Montgomery-path generation vs the brute-force reference
fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("zeta_generation");
    let token = CancelToken::new();

    for params in ALL_PARAMS {
        group.throughput(Throughput::Elements(params.n as u64));
        group.bench_with_input(
            BenchmarkId::new("montgomery", params.name),
            params,
            |bench, p| bench.iter(|| generate_zetas(black_box(p))),
        );
        group.bench_with_input(
            BenchmarkId::new("reference", params.name),
            params,
            |bench, p| bench.iter(|| reference_table(black_box(p), &token)),
        );
    }

    group.finish();
}

/// Benchmark generate + verify, the full cross-check
fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("zeta_verify");
    let token = CancelToken::new();

    for params in ALL_PARAMS {
        let table = generate_zetas(params).expect("presets are valid");
        group.throughput(Throughput::Elements(params.n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(params.name), &table, |bench, t| {
            bench.iter(|| verify_table(black_box(t), &token))
        });
    }

    group.finish();
}

/// Benchmark comparison of random tables with sparse disagreements
fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare_tables");
    let mut rng = bench_rng();

    for &n in &[64usize, 256, 1024, 4096] {
        let python: Vec<i16> = (0..n).map(|_| rng.gen_range(0..3329)).collect();
        let mut reference = python.clone();
        for _ in 0..n / 16 {
            let i = rng.gen_range(0..n);
            reference[i] = rng.gen_range(0..3329);
        }

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(python, reference),
            |bench, (p, r)| bench.iter(|| compare_tables(black_box(p), black_box(r))),
        );
    }

    group.finish();
}

criterion_group!(
    name = reduction;
    config = Criterion::default();
    targets = bench_montgomery_reduce
);

criterion_group!(
    name = tables;
    config = Criterion::default();
    targets = bench_generation,
              bench_verify,
              bench_compare
);

criterion_main!(reduction, tables);
