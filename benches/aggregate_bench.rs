//! Benchmarks for the ledger core
//!
//! Run with: cargo bench

use ausgabenzettel::ledger::*;
use chrono::{NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

// 2026-01-01T00:00:00Z
const START: i64 = 1_767_225_600_000;
const HOUR_MS: i64 = 3_600_000;

fn create_test_records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let ts = Timestamp::from_millis(START + i as i64 * HOUR_MS);
            if i % 10 == 9 {
                // remove the previous entry every tenth record
                Record::Remove(Tombstone::remove(Timestamp::from_millis(
                    START + (i as i64 - 1) * HOUR_MS,
                )))
            } else {
                Record::Entry(Entry::new(
                    Amount::from_cents(i as i64 * 7 % 5000),
                    DEFAULT_CURRENCY,
                    i % LABELS.len(),
                    ts,
                ))
            }
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

    for size in [100, 1000, 10000] {
        let records = create_test_records(size);

        group.throughput(Throughput::Elements(size as u64));

        for period in [Period::All, Period::Weekly] {
            let filter = Filter::new(period, day);
            group.bench_function(format!("{}_{}", period, size), |b| {
                b.iter(|| aggregate(black_box(&records), &filter, &Utc))
            });
        }
    }

    group.finish();
}

fn bench_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");

    for size in [100, 1000] {
        let store = EntryStore::new(MemoryStore::new());
        store.save(&create_test_records(size)).unwrap();

        group.bench_function(format!("load_{}", size), |b| {
            b.iter(|| black_box(store.load().unwrap()))
        });
    }

    group.finish();
}

fn bench_donut(c: &mut Criterion) {
    let records = create_test_records(1000);
    let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let summary = aggregate(&records, &Filter::all(day), &Utc);
    let slices = donut::slices(&summary);

    c.bench_function("donut_six_labels", |b| {
        b.iter(|| donut(black_box(&slices), 224.0, 50.0))
    });
}

criterion_group!(benches, bench_aggregate, bench_store, bench_donut);
criterion_main!(benches);
