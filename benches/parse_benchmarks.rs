//! Performance benchmarks for series parsing and cache reads.
//!
//! - Parsing a full-history monthly CSV (~800 rows) with some filtered rows
//! - Converting decimal years to timestamps
//! - Cache hits on a shared snapshot

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use one_earth_api::fetcher::{decimal_year_to_datetime, parse_series};
use one_earth_api::TtlCache;
use std::fmt::Write;
use std::time::Duration;

/// Build a CSV shaped like the upstream file, one row per month since 1958.
fn synthetic_csv() -> String {
    let mut csv = String::from("year,month,decimal date,average,deseasonalized,ndays,sdev,unc\n");
    for year in 1958..2026 {
        for month in 1..=12 {
            let decimal = year as f64 + (month as f64 - 0.5) / 12.0;
            if month == 6 && year % 7 == 0 {
                let _ = writeln!(csv, "{},{},{:.4},-99.99,0,-1,-9.99,-0.99", year, month, decimal);
            } else {
                let value = 315.0 + (year - 1958) as f64 * 1.6;
                let _ = writeln!(
                    csv,
                    "{},{},{:.4},{:.2},{:.2},30,0.50,0.20",
                    year, month, decimal, value, value
                );
            }
        }
    }
    csv
}

fn bench_parse_series(c: &mut Criterion) {
    let csv = synthetic_csv();

    c.bench_function("parse_series_full_history", |b| {
        b.iter(|| parse_series(black_box(&csv)).unwrap())
    });
}

fn bench_decimal_year(c: &mut Criterion) {
    c.bench_function("decimal_year_to_datetime", |b| {
        b.iter(|| decimal_year_to_datetime(black_box(2025.6250)))
    });
}

fn bench_cache_hit(c: &mut Criterion) {
    let snapshot = parse_series(&synthetic_csv()).unwrap();
    let cache = TtlCache::new(Duration::from_secs(3600));
    cache.set("series".to_string(), snapshot);
    let key = "series".to_string();

    c.bench_function("cache_hit_snapshot", |b| {
        b.iter(|| cache.get(black_box(&key)).unwrap())
    });
}

criterion_group!(benches, bench_parse_series, bench_decimal_year, bench_cache_hit);
criterion_main!(benches);
