//! Decode and format throughput.
//!
//! Run with: `cargo bench --package tickday-bench`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::io::sink;
use tickday_bench::{FIXTURE_SCALE, fixture_hour, synthetic_payload, synthetic_ticks};
use tickday_lib::{CsvFormatter, Formatter, GzipCsvFormatter, decode_hour};

/// Ticks per hour: a quiet hour, a typical one and a news spike.
const HOUR_SIZES: [usize; 3] = [500, 5_000, 50_000];

fn decode_benchmark(c: &mut Criterion) {
    let hour = fixture_hour();
    let mut group = c.benchmark_group("decode_hour");

    for size in HOUR_SIZES {
        let payload = synthetic_payload(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            b.iter(|| decode_hour(hour, black_box(payload), FIXTURE_SCALE).count());
        });
    }

    group.finish();
}

fn format_benchmark(c: &mut Criterion) {
    // A full day of typical hours.
    let ticks = synthetic_ticks(24 * 5_000);
    let mut group = c.benchmark_group("format_day");
    group.throughput(Throughput::Elements(ticks.len() as u64));

    group.bench_function("csv", |b| {
        let formatter = CsvFormatter::new();
        b.iter(|| formatter.write_ticks(black_box(&ticks), sink()));
    });

    group.bench_function("csv_gz", |b| {
        let formatter = GzipCsvFormatter::default();
        b.iter(|| formatter.write_ticks(black_box(&ticks), sink()));
    });

    group.finish();
}

criterion_group!(benches, decode_benchmark, format_benchmark);
criterion_main!(benches);
