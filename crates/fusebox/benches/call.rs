// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.
#![expect(missing_docs, reason = "benchmark code")]
use std::hint::black_box;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use fusebox::{CircuitBreaker, CircuitState, CircuitStore, InMemoryStore, OperationError, Outcome};
use tick::{Clock, ClockControl};

fn ok() -> Result<Outcome<u32>, OperationError> {
    Ok(Outcome::success(1))
}

fn fail() -> Result<Outcome<u32>, OperationError> {
    Err(OperationError::from_message("bench"))
}

fn entry(c: &mut Criterion) {
    let mut group = c.benchmark_group("call");

    // Baseline without a breaker
    group.bench_function("no-breaker", |b| {
        b.iter(|| black_box(ok()));
    });

    // Closed circuit, successful operation
    let breaker = CircuitBreaker::in_memory(Clock::new_frozen());
    group.bench_function("closed-success", |b| {
        b.iter(|| black_box(breaker.call("bench", ok)));
    });

    // Closed circuit, failures below a threshold that is never reached
    let breaker = CircuitBreaker::builder(InMemoryStore::new(), Clock::new_frozen())
        .failure_threshold(u32::MAX)
        .build();
    group.bench_function("closed-failure", |b| {
        b.iter(|| black_box(breaker.call("bench", fail)));
    });

    // Open circuit that never cools down, every call is rejected
    let store = InMemoryStore::new();
    let control = ClockControl::new();
    store.save_state("bench", CircuitState::Open).expect("in-memory store never fails");
    store
        .set_last_open_time("bench", control.to_clock().system_time())
        .expect("in-memory store never fails");
    let breaker = CircuitBreaker::builder(store, control.to_clock())
        .cooldown(Duration::from_secs(3600))
        .build();
    group.bench_function("open-rejected", |b| {
        b.iter(|| black_box(breaker.call("bench", ok)));
    });

    group.finish();
}

criterion_group!(benches, entry);
criterion_main!(benches);
