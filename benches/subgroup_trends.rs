//! Subgroup trend computation benchmark
//!
//! Measures the 1-level computer and the legacy detector on synthetic data
//! with a growing number of continuous variables.
//!
//! # Run Instructions
//!
//! ```bash
//! cargo bench --bench subgroup_trends
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use detect_sp::dataset::Dataset;
use detect_sp::engine::{LegacyDetector, SubgroupTrendComputer};
use detect_sp::results::{LabeledResults, DEFAULT_TREND_COLUMNS};
use detect_sp::reversal::SignReversal;

const ROWS: usize = 2_000;
const GROUPS: [&str; 4] = ["north", "south", "east", "west"];

/// Deterministic pseudo-random data: each variable drifts up with the row
/// index and is shifted down per group, so reversals show up
fn synthetic_dataset(n_vars: usize) -> Dataset {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 1000) as f64 / 1000.0
    };

    let groups: Vec<&str> = (0..ROWS).map(|i| GROUPS[i % GROUPS.len()]).collect();
    let mut data = Dataset::new();
    for v in 0..n_vars {
        let values: Vec<f64> = (0..ROWS)
            .map(|i| {
                let g = (i % GROUPS.len()) as f64;
                i as f64 / ROWS as f64 - g * (v as f64 + 1.0) * 0.3 + next()
            })
            .collect();
        data = data
            .with_float(format!("x{}", v), values)
            .expect("synthetic columns share one length");
    }
    data.with_str("region", groups)
        .expect("synthetic columns share one length")
}

fn bench_compute_1lev(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_1lev");
    for n_vars in [4, 8, 16] {
        let data = synthetic_dataset(n_vars);
        group.bench_with_input(BenchmarkId::from_parameter(n_vars), &data, |b, data| {
            b.iter(|| {
                let table = SubgroupTrendComputer::new(black_box(data))
                    .with_trend_names(&["pearson_corr", "lin_reg"])
                    .expect("built-in trend names")
                    .compute_1lev()
                    .expect("synthetic data is consistent");
                black_box(table)
            });
        });
    }
    group.finish();
}

fn bench_legacy(c: &mut Criterion) {
    let mut group = c.benchmark_group("legacy_detect");
    for n_vars in [4, 8, 16] {
        let data = synthetic_dataset(n_vars);
        group.bench_with_input(BenchmarkId::from_parameter(n_vars), &data, |b, data| {
            b.iter(|| black_box(LegacyDetector::new(black_box(data)).detect()));
        });
    }
    group.finish();
}

fn bench_labeling(c: &mut Criterion) {
    let data = synthetic_dataset(16);
    let table = SubgroupTrendComputer::new(&data)
        .with_trend_names(&["pearson_corr"])
        .expect("built-in trend names")
        .compute_1lev()
        .expect("synthetic data is consistent");

    c.bench_function("label_and_views", |b| {
        b.iter(|| {
            let mut results = LabeledResults::new(table.clone());
            black_box(results.get_sp_views(&SignReversal, DEFAULT_TREND_COLUMNS, true))
        });
    });
}

criterion_group!(benches, bench_compute_1lev, bench_legacy, bench_labeling);
criterion_main!(benches);
