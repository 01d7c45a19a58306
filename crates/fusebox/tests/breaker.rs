// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! End-to-end behavior of the circuit breaker over real and mock stores.

#![cfg(feature = "memory")]

use std::cell::Cell;
use std::time::{Duration, SystemTime};

use fusebox::{CircuitBreaker, CircuitError, CircuitErrorKind, CircuitState, CircuitStore, InMemoryStore, OperationError, Outcome};
use fusebox_store::testing::{MockStore, StoreOp};
use recoverable::{Recovery, RecoveryKind};
use rstest::rstest;
use tick::ClockControl;

const TARGET: &str = "inventory";

fn fail() -> Result<Outcome<()>, OperationError> {
    Err(OperationError::from_message("connection refused"))
}

fn succeed() -> Result<Outcome<()>, OperationError> {
    Ok(Outcome::success(()))
}

fn breaker<S: CircuitStore>(store: S, control: &ClockControl, threshold: u32) -> CircuitBreaker<S> {
    CircuitBreaker::builder(store, control.to_clock())
        .failure_threshold(threshold)
        .cooldown(Duration::from_secs(5))
        .build()
}

#[test]
fn closed_circuit_passes_results_through() {
    let control = ClockControl::new();
    let breaker = breaker(InMemoryStore::new(), &control, 3);

    let outcome = breaker.call(TARGET, || Ok(Outcome::success(42))).unwrap();
    assert_eq!(outcome, Outcome::Success(42));

    let outcome = breaker.call(TARGET, || Ok(Outcome::failure("missing"))).unwrap();
    assert_eq!(outcome, Outcome::Failure("missing"));

    let error = breaker.call(TARGET, fail).unwrap_err();
    assert_eq!(error.kind(), CircuitErrorKind::Operation);
    assert!(error.to_string().contains("connection refused"));
}

#[test]
fn unknown_target_starts_closed() {
    let breaker = breaker(InMemoryStore::new(), &ClockControl::new(), 3);

    let snapshot = breaker.snapshot("never-seen").unwrap();

    assert_eq!(snapshot.state, CircuitState::Closed);
    assert_eq!(snapshot.failure_count, 0);
    assert_eq!(snapshot.last_opened, None);
}

#[test]
fn documented_scenario() {
    let control = ClockControl::new();
    let breaker = breaker(InMemoryStore::new(), &control, 3);

    assert_eq!(breaker.call(TARGET, fail).unwrap_err().kind(), CircuitErrorKind::Operation);
    assert_eq!(breaker.call(TARGET, fail).unwrap_err().kind(), CircuitErrorKind::Operation);

    let error = breaker.call(TARGET, fail).unwrap_err();
    assert!(matches!(error, CircuitError::Tripped { .. }));
    assert_eq!(breaker.snapshot(TARGET).unwrap().state, CircuitState::Open);

    control.advance(Duration::from_secs(1));
    let attempted = Cell::new(false);
    let error = breaker
        .call(TARGET, || {
            attempted.set(true);
            succeed()
        })
        .unwrap_err();
    assert!(error.is_rejected());
    assert!(!attempted.get());

    control.advance(Duration::from_secs(5));
    breaker
        .call(TARGET, || {
            attempted.set(true);
            succeed()
        })
        .unwrap();
    assert!(attempted.get());

    let snapshot = breaker.snapshot(TARGET).unwrap();
    assert_eq!(snapshot.state, CircuitState::Closed);
    assert_eq!(snapshot.failure_count, 0);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(10)]
fn circuit_opens_exactly_at_threshold(#[case] threshold: u32) {
    let breaker = breaker(InMemoryStore::new(), &ClockControl::new(), threshold);

    for attempt in 1..threshold {
        let error = breaker.call(TARGET, fail).unwrap_err();
        assert_eq!(error.kind(), CircuitErrorKind::Operation, "attempt {attempt}");
        assert_eq!(breaker.snapshot(TARGET).unwrap().failure_count, attempt);
    }

    let error = breaker.call(TARGET, fail).unwrap_err();
    assert!(matches!(error, CircuitError::Tripped { .. }), "got: {error:?}");
    assert_eq!(breaker.snapshot(TARGET).unwrap().state, CircuitState::Open);
}

#[test]
fn success_resets_the_streak() {
    let breaker = breaker(InMemoryStore::new(), &ClockControl::new(), 3);

    let _ = breaker.call(TARGET, fail);
    let _ = breaker.call(TARGET, fail);
    breaker.call(TARGET, succeed).unwrap();
    let _ = breaker.call(TARGET, fail);
    let _ = breaker.call(TARGET, fail);

    let snapshot = breaker.snapshot(TARGET).unwrap();
    assert_eq!(snapshot.state, CircuitState::Closed);
    assert_eq!(snapshot.failure_count, 2);
}

#[test]
fn domain_failures_never_open_the_circuit() {
    let breaker = breaker(InMemoryStore::new(), &ClockControl::new(), 1);

    for _ in 0..5 {
        let outcome = breaker.call(TARGET, || Ok(Outcome::failure(404))).unwrap();
        assert!(!outcome.is_success());
    }

    assert!(breaker.snapshot(TARGET).unwrap().is_closed());
}

#[test]
fn rejection_performs_no_writes() {
    let store = MockStore::new();
    let control = ClockControl::new();
    let breaker = breaker(store.clone(), &control, 1);
    let _ = breaker.call(TARGET, fail);
    control.advance(Duration::from_secs(2));
    store.clear_operations();

    assert!(breaker.call(TARGET, succeed).unwrap_err().is_rejected());

    assert!(store.writes().is_empty(), "unexpected writes: {:?}", store.writes());
}

#[test]
fn failed_probe_reopens_and_restarts_cooldown() {
    let control = ClockControl::new();
    let breaker = breaker(InMemoryStore::new(), &control, 2);
    let _ = breaker.call(TARGET, fail);
    let _ = breaker.call(TARGET, fail);

    control.advance(Duration::from_secs(5));
    let error = breaker.call(TARGET, fail).unwrap_err();
    assert_eq!(error.kind(), CircuitErrorKind::HalfOpen);
    assert_eq!(error.target(), Some(TARGET));

    let snapshot = breaker.snapshot(TARGET).unwrap();
    assert_eq!(snapshot.state, CircuitState::Open);
    assert_eq!(snapshot.failure_count, 2);
    assert_eq!(snapshot.last_opened, Some(SystemTime::UNIX_EPOCH + Duration::from_secs(5)));

    control.advance(Duration::from_secs(4));
    assert!(breaker.call(TARGET, succeed).unwrap_err().is_rejected());

    control.advance(Duration::from_secs(1));
    breaker.call(TARGET, succeed).unwrap();
    assert!(breaker.snapshot(TARGET).unwrap().is_closed());
}

#[test]
fn targets_are_independent() {
    let breaker = breaker(InMemoryStore::new(), &ClockControl::new(), 1);

    let _ = breaker.call("billing", fail);

    assert!(breaker.call("billing", succeed).unwrap_err().is_rejected());
    breaker.call("shipping", succeed).unwrap();
    assert!(breaker.snapshot("shipping").unwrap().is_closed());
}

#[test]
fn breakers_sharing_a_store_share_circuits() {
    let store = InMemoryStore::new();
    let control = ClockControl::new();
    let first = breaker(store.clone(), &control, 1);
    let second = breaker(store, &control, 1);

    let _ = first.call(TARGET, fail);

    assert!(second.call(TARGET, succeed).unwrap_err().is_rejected());
}

#[test]
fn circuit_opened_elsewhere_without_timestamp_waits_a_full_cooldown() {
    let store = InMemoryStore::new();
    store.save_state(TARGET, CircuitState::Open).unwrap();
    let control = ClockControl::new();
    let breaker = breaker(store.clone(), &control, 3);

    assert!(breaker.call(TARGET, succeed).unwrap_err().is_rejected());
    assert_eq!(store.last_open_time(TARGET).unwrap(), Some(SystemTime::UNIX_EPOCH));

    control.advance(Duration::from_secs(5));
    breaker.call(TARGET, succeed).unwrap();
}

#[test]
fn storage_failures_surface_as_storage_errors() {
    let store = MockStore::new();
    store.fail_when(|op| matches!(op, StoreOp::ResetFailureCount(_)));
    let breaker = breaker(store, &ClockControl::new(), 3);
    let ran = Cell::new(false);

    let error = breaker
        .call(TARGET, || {
            ran.set(true);
            succeed()
        })
        .unwrap_err();

    assert!(ran.get());
    assert_eq!(error.kind(), CircuitErrorKind::Storage);
    assert_eq!(error.recovery().kind(), RecoveryKind::Unknown);
}

#[test]
fn storage_failure_before_admission_skips_the_operation() {
    let store = MockStore::new();
    store.fail_when(|op| matches!(op, StoreOp::State(_)));
    let breaker = breaker(store, &ClockControl::new(), 3);
    let ran = Cell::new(false);

    let error = breaker
        .call(TARGET, || {
            ran.set(true);
            succeed()
        })
        .unwrap_err();

    assert!(!ran.get());
    assert!(matches!(error, CircuitError::Storage(_)));
}

#[test]
fn open_errors_are_unavailable() {
    let breaker = breaker(InMemoryStore::new(), &ClockControl::new(), 1);

    let tripped = breaker.call(TARGET, fail).unwrap_err();
    let rejected = breaker.call(TARGET, succeed).unwrap_err();

    assert_eq!(tripped.recovery().kind(), RecoveryKind::Unavailable);
    assert_eq!(rejected.recovery().kind(), RecoveryKind::Unavailable);
}

#[tokio::test]
async fn async_calls_share_state_with_sync_calls() {
    let control = ClockControl::new();
    let breaker = breaker(InMemoryStore::new(), &control, 1);

    let _ = breaker.call(TARGET, fail);

    let error = breaker
        .call_async(TARGET, || async { Ok::<_, OperationError>(Outcome::success(())) })
        .await
        .unwrap_err();
    assert!(error.is_rejected());

    control.advance(Duration::from_secs(5));
    let outcome = breaker
        .call_async(TARGET, || async { Ok::<_, OperationError>(Outcome::success("recovered")) })
        .await
        .unwrap();
    assert_eq!(outcome.into_payload(), "recovered");
}
