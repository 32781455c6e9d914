//! Criterion benchmarks for the cost aggregator

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use seasoncost::config::AnalysisConfig;
use seasoncost::services::Aggregator;
use seasoncost::types::{RawCostRecord, UnitCosts};
use std::hint::black_box;

const CATEGORIES: [&str; 7] = [
    "Outer", "Inner", "Bottom", "Shoes", "Bag", "Acc_etc", "Wear_etc",
];

/// Deterministic synthetic rows spread over ~`n / 20` item keys
fn synthetic_records(n: usize) -> Vec<RawCostRecord> {
    (0..n)
        .map(|i| {
            let base = (i % 97) as f64;
            RawCostRecord {
                brand: "M".into(),
                season: if i % 2 == 0 { "전년" } else { "당년" }.into(),
                category: CATEGORIES[i % CATEGORIES.len()].into(),
                item_name: format!("item-{}", i % (n / 20).max(1)),
                tag_price_krw: 49_000.0 + base * 1_000.0,
                quantity: (i % 500) as u64,
                usd: UnitCosts {
                    material: 3.0 + base * 0.1,
                    artwork: 0.5,
                    submaterial: 1.2,
                    tag_label: 0.1,
                    labor: 2.0 + base * 0.05,
                    hq_supply: 0.0,
                    margin: 0.4,
                    expense: 0.3,
                },
                ..Default::default()
            }
        })
        .collect()
}

fn bench_by_item(c: &mut Criterion) {
    let config = AnalysisConfig::default();
    let mut group = c.benchmark_group("aggregator");

    for size in [1_000usize, 10_000, 100_000] {
        let records = synthetic_records(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("by_item", size), &records, |b, records| {
            b.iter(|| Aggregator::by_item(black_box(records), &config));
        });
    }

    group.finish();
}

fn bench_rollup(c: &mut Criterion) {
    let config = AnalysisConfig::default();
    let items = Aggregator::by_item(&synthetic_records(100_000), &config);

    c.bench_function("aggregator/by_category", |b| {
        b.iter(|| Aggregator::by_category(black_box(&items), &config));
    });
    c.bench_function("aggregator/total", |b| {
        b.iter(|| Aggregator::total(black_box(&items), None, &config));
    });
}

criterion_group!(benches, bench_by_item, bench_rollup);
criterion_main!(benches);
