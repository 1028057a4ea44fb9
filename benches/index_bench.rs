//! Benchmarks for the dataset indexer
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use sages::dataset::{Period, Sage};
use sages::index::{DatasetIndexer, IndexerConfig, PeriodOrdering, UnresolvedPolicy};
use sages::layout::{Grid, LayoutConfig};
use sages::LabelStyle;

fn create_periods(count: usize) -> Vec<Period> {
    (0..count)
        .map(|i| {
            let start = -400 + (count - i) as i32 * 50;
            Period::new(format!("period_{}", i), format!("Period {}", i), start, start + 49)
        })
        .collect()
}

fn create_sages(count: usize, periods: usize) -> Vec<Sage> {
    (0..count)
        .map(|i| {
            let period = i % periods;
            Sage::new(
                format!("sage_{}", i),
                format!("period_{}", period),
                format!("{}", i % 7),
                -400 + period as i32 * 50,
            )
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_index");
    let periods = create_periods(12);

    for size in [100, 1000, 10000] {
        let sages = create_sages(size, periods.len());
        group.throughput(Throughput::Elements(size as u64));

        for ordering in [PeriodOrdering::Declared, PeriodOrdering::Chronological] {
            let indexer = DatasetIndexer::new(IndexerConfig {
                period_ordering: ordering,
                unresolved_policy: UnresolvedPolicy::Quarantine,
            });

            group.bench_function(format!("{}_{}", ordering, size), |b| {
                b.iter(|| indexer.build(black_box(&periods), black_box(&sages)).unwrap())
            });
        }
    }

    group.finish();
}

fn bench_grid(c: &mut Criterion) {
    let periods = create_periods(12);
    let sages = create_sages(1000, periods.len());
    let index = DatasetIndexer::default().build(&periods, &sages).unwrap();
    let labels = LabelStyle::default();
    let layout = LayoutConfig::default();

    c.bench_function("grid_1000", |b| {
        b.iter(|| Grid::build(black_box(&index), &labels, &layout))
    });
}

criterion_group!(benches, bench_build, bench_grid);
criterion_main!(benches);
