// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Benchmarks for recording, instrumentation and extraction.

use std::convert::Infallible;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tempfile::TempDir;

use alog::config::InstrumentationConfig;
use alog::event::{CognitiveEvent, OperationStatus, OperationalEvent};
use alog::reasoning::{extract, TRACE_END, TRACE_START};
use alog::sink::SinkSet;
use alog::{instrument, CallShape, Instrumentable, Logger, RecordOptions};

struct Worker;

impl Worker {
    fn work(&self, n: u64) -> u64 {
        n * 2
    }
}

impl Instrumentable for Worker {
    fn operations(&self) -> &'static [&'static str] {
        &["work"]
    }
}

/// Benchmark recording into each sink kind.
fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger/record");

    let memory = Logger::new(SinkSet::memory(false));
    group.bench_function("memory_operational", |b| {
        b.iter(|| {
            memory.record_operational(
                "bench",
                OperationalEvent::new("step", OperationStatus::Start).with_metadata("args_count", 1),
                RecordOptions::new(),
            )
        });
    });

    let temp = TempDir::new().unwrap();
    let jsonl = Logger::from_config(
        &InstrumentationConfig::default().with_output_directory(temp.path().join("logs")),
    )
    .unwrap();
    group.bench_function("jsonl_cognitive", |b| {
        b.iter(|| {
            jsonl.record_cognitive(
                "bench",
                CognitiveEvent::new().with_thought(black_box("considering options")),
                RecordOptions::new(),
            )
        });
    });

    group.finish();
}

/// Benchmark the overhead of a wrapped call.
fn bench_instrumented_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger/instrument");
    let logger = Arc::new(Logger::new(SinkSet::memory(false)));

    let plain = instrument(logger.clone(), Worker, "worker", Some(&[]));
    group.bench_function("pass_through", |b| {
        b.iter(|| {
            let out: Result<u64, Infallible> =
                plain.call("work", CallShape::positional(1), |w| Ok(w.work(black_box(21))));
            out
        });
    });

    let wrapped = instrument(logger, Worker, "worker", None);
    group.bench_function("wrapped", |b| {
        b.iter(|| {
            let out: Result<u64, Infallible> =
                wrapped.call("work", CallShape::positional(1), |w| Ok(w.work(black_box(21))));
            out
        });
    });

    group.finish();
}

/// Benchmark reasoning extraction on different text sizes.
fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("reasoning/extract");

    for size in [100, 10_000] {
        let body = "a".repeat(size);
        let with_trace = format!("{}{}{}{}", body, TRACE_START, body, TRACE_END);

        group.bench_with_input(BenchmarkId::new("no_markers", size), &body, |b, text| {
            b.iter(|| extract(black_box(text)));
        });
        group.bench_with_input(BenchmarkId::new("with_trace", size), &with_trace, |b, text| {
            b.iter(|| extract(black_box(text)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_record, bench_instrumented_call, bench_extract);
criterion_main!(benches);
