// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The circuit breaker and its configuration.

use std::time::Duration;

use fusebox_store::CircuitStore;
use tick::Clock;

use crate::telemetry::Telemetry;
use crate::{AsyncOperation, CircuitError, Operation, Outcome};

mod builder;
mod config;
mod engine;
mod snapshot;

pub use builder::CircuitBreakerBuilder;
pub use config::BreakerConfig;
pub use snapshot::CircuitSnapshot;

#[derive(Debug, Clone, Copy)]
pub(crate) struct BreakerOptions {
    pub failure_threshold: u32,
    pub cooldown: Duration,
}

/// Guards calls to failing targets by failing fast once they keep failing.
///
/// The breaker keeps no state of its own: every decision reads the circuit of the target from
/// the [`CircuitStore`] and writes the outcome back. Breakers built over the same store (or
/// clones of it) therefore share circuits, while targets never influence each other.
///
/// For each target:
///
/// - **Closed**: calls run. Each failure increments the failure count and any success resets
///   it. The failure that reaches the threshold opens the circuit.
/// - **Open**: calls are rejected without running until the cooldown has elapsed since the
///   circuit opened. The first call after that moves the circuit to half-open and runs as
///   the probe.
/// - **Half-open**: the probe runs. Success closes the circuit; failure opens it again and
///   restarts the cooldown.
///
/// # Concurrency
///
/// The breaker adds no synchronization. Each store operation is atomic on its own, but the
/// read-decide-write sequence of one call is not. Concurrent callers may both see the
/// threshold reached (harmless, opening twice is idempotent), and a call checking the
/// cooldown can overlap a running probe, letting more than one probe through. Use a store
/// that serializes per-target access if a single probe must be guaranteed.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use fusebox::{CircuitBreaker, CircuitErrorKind, OperationError, Outcome};
/// use tick::ClockControl;
///
/// let control = ClockControl::new();
/// let breaker = CircuitBreaker::in_memory(control.to_clock());
///
/// for _ in 0..3 {
///     let _ = breaker.call("inventory", || Err::<Outcome<()>, _>(OperationError::from_message("timeout")));
/// }
///
/// // The circuit is open: the operation is not even attempted.
/// let error = breaker.call("inventory", || Ok(Outcome::success(()))).unwrap_err();
/// assert_eq!(error.kind(), CircuitErrorKind::Open);
///
/// // After the cooldown, the next call probes and closes the circuit.
/// control.advance(Duration::from_secs(5));
/// let outcome = breaker.call("inventory", || Ok(Outcome::success("restocked")))?;
/// assert_eq!(outcome.into_payload(), "restocked");
/// # Ok::<(), fusebox::CircuitError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CircuitBreaker<S> {
    store: S,
    clock: Clock,
    options: BreakerOptions,
    telemetry: Telemetry,
}

impl<S: CircuitStore> CircuitBreaker<S> {
    /// Creates a builder for a breaker over `store` that reads time from `clock`.
    pub fn builder(store: S, clock: impl AsRef<Clock>) -> CircuitBreakerBuilder<S> {
        CircuitBreakerBuilder::new(store, clock.as_ref().clone())
    }

    /// Runs `operation` for `target` if the circuit allows it.
    ///
    /// Returns the operation's [`Outcome`] when it completes without an
    /// [`OperationError`][crate::OperationError]. A domain-level [`Outcome::Failure`] is
    /// returned as-is and counts as a success for the circuit.
    ///
    /// # Errors
    ///
    /// - [`CircuitError::Rejected`] if the circuit is open and cooling down; the operation
    ///   does not run.
    /// - [`CircuitError::Tripped`] if the operation failed and this failure opened the circuit.
    /// - [`CircuitError::ProbeFailed`] if the operation was the half-open probe and failed.
    /// - [`CircuitError::Operation`] if the operation failed below the threshold.
    /// - [`CircuitError::Storage`] if the store failed at any point.
    pub fn call<O: Operation>(&self, target: &str, operation: O) -> Result<Outcome<O::Output>, CircuitError> {
        debug_assert!(!target.is_empty(), "target must not be empty");

        let mode = self.enter(target)?;
        let result = operation.execute();
        self.exit(target, mode, result)
    }

    /// Runs an asynchronous `operation` for `target` if the circuit allows it.
    ///
    /// Behaves exactly like [`call`][Self::call]; only the operation itself is awaited.
    ///
    /// # Errors
    ///
    /// The same as [`call`][Self::call].
    ///
    /// # Examples
    ///
    /// ```
    /// use fusebox::{CircuitBreaker, OperationError, Outcome};
    /// use tick::Clock;
    ///
    /// # futures::executor::block_on(async {
    /// let breaker = CircuitBreaker::in_memory(Clock::new_frozen());
    ///
    /// let outcome = breaker
    ///     .call_async("search", || async { Ok::<_, OperationError>(Outcome::success(3)) })
    ///     .await?;
    ///
    /// assert_eq!(outcome, Outcome::Success(3));
    /// # Ok::<(), fusebox::CircuitError>(())
    /// # }).unwrap();
    /// ```
    pub async fn call_async<O: AsyncOperation>(&self, target: &str, operation: O) -> Result<Outcome<O::Output>, CircuitError> {
        debug_assert!(!target.is_empty(), "target must not be empty");

        let mode = self.enter(target)?;
        let result = operation.execute().await;
        self.exit(target, mode, result)
    }

    /// Reads what the store holds for `target` without changing anything.
    ///
    /// # Errors
    ///
    /// Returns [`CircuitError::Storage`] if the store fails.
    pub fn snapshot(&self, target: &str) -> Result<CircuitSnapshot, CircuitError> {
        Ok(CircuitSnapshot {
            state: self.store.state(target)?,
            failure_count: self.store.failure_count(target)?,
            last_opened: self.store.last_open_time(target)?,
        })
    }
}

impl<S> CircuitBreaker<S> {
    /// Returns the store backing this breaker.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the number of consecutive failures that opens the circuit.
    #[must_use]
    pub fn failure_threshold(&self) -> u32 {
        self.options.failure_threshold
    }

    /// Returns how long the circuit stays open before a probe is allowed.
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        self.options.cooldown
    }

    /// Returns the name reported in telemetry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.telemetry.breaker_name
    }
}

#[cfg(feature = "memory")]
impl CircuitBreaker<fusebox_memory::InMemoryStore> {
    /// Creates a breaker with default settings over a fresh [`InMemoryStore`][fusebox_memory::InMemoryStore].
    #[must_use]
    pub fn in_memory(clock: impl AsRef<Clock>) -> Self {
        Self::builder(fusebox_memory::InMemoryStore::new(), clock).build()
    }
}
