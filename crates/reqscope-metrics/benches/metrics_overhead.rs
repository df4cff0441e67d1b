// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Benchmark request recording and exposition cost
//!
//! Measures the per-request cost of the instrumentation hook and the cost of
//! rendering a scrape as the number of series grows.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use reqscope_metrics::{render, Registry, RequestMetrics};
use std::hint::black_box;

const ROUTES: [&str; 4] = ["/", "/slow", "/metrics", "/health"];
const STATUSES: [u16; 3] = [200, 404, 500];

/// Record `iterations` requests spread over a few routes and statuses
fn record_requests(metrics: &RequestMetrics, iterations: u64) {
    for i in 0..iterations {
        let route = ROUTES[(i % ROUTES.len() as u64) as usize];
        let status = STATUSES[(i % STATUSES.len() as u64) as usize];
        let elapsed_ms = (i % 2500) as f64;

        let _ = metrics.record("GET", route, status, black_box(elapsed_ms));
    }
}

fn bench_record(c: &mut Criterion) {
    let registry = Registry::new();
    let metrics = RequestMetrics::new(&registry).unwrap();
    let mut group = c.benchmark_group("record_request");

    for iterations in [1_000, 10_000, 100_000] {
        group.bench_with_input(
            BenchmarkId::new("hot_series", iterations),
            &iterations,
            |b, &iterations| {
                b.iter(|| record_requests(&metrics, iterations));
            },
        );
    }

    group.finish();
}

fn bench_contended_record(c: &mut Criterion) {
    let registry = Registry::new();
    let metrics = RequestMetrics::new(&registry).unwrap();

    c.bench_function("record_request_4_threads", |b| {
        b.iter(|| {
            std::thread::scope(|scope| {
                for _ in 0..4 {
                    scope.spawn(|| record_requests(&metrics, 10_000));
                }
            });
        });
    });
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for series in [10usize, 100, 1_000] {
        let registry = Registry::new();
        let metrics = RequestMetrics::new(&registry).unwrap();
        for i in 0..series {
            let _ = metrics.record("GET", &format!("/item/{}", i), 200, i as f64);
        }

        group.bench_with_input(BenchmarkId::new("series", series), &registry, |b, registry| {
            b.iter(|| black_box(render(registry)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_record, bench_contended_record, bench_render);
criterion_main!(benches);
