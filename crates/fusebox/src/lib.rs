// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A storage-backed circuit breaker.
//!
//! A [`CircuitBreaker`] protects callers from repeatedly invoking an operation against a target
//! that keeps failing. It counts consecutive failures per target, fails fast once a threshold is
//! crossed, and lets a single probe call through after a cooldown to find out whether the target
//! recovered.
//!
//! ```text
//! caller ──▶ CircuitBreaker::call(target, operation)
//!               │  read circuit from the store
//!               ├─ open and cooling down ──▶ CircuitError::Rejected
//!               ├─ run the operation
//!               │  write the outcome back to the store
//!               └─▶ Outcome or CircuitError
//! ```
//!
//! All circuit state lives in a [`CircuitStore`]. The breaker itself is a thin decision layer,
//! so several breakers (or several processes, given a shared backend) can guard the same
//! targets.
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//!
//! use fusebox::{CircuitBreaker, CircuitError, InMemoryStore, OperationError, Outcome};
//! use tick::Clock;
//!
//! fn fetch_price(sku: &str) -> Result<Outcome<u64>, OperationError> {
//!     match sku {
//!         "apple" => Ok(Outcome::success(120)),
//!         _ => Ok(Outcome::failure(0)),
//!     }
//! }
//!
//! # fn main() -> Result<(), CircuitError> {
//! # let clock = Clock::new_frozen();
//! let breaker = CircuitBreaker::builder(InMemoryStore::new(), &clock)
//!     .failure_threshold(3)
//!     .cooldown(Duration::from_secs(5))
//!     .build();
//!
//! let price = breaker.call("pricing", || fetch_price("apple"))?;
//! assert_eq!(price.into_payload(), 120);
//! # Ok(())
//! # }
//! ```
//!
//! # Failures
//!
//! Only an [`OperationError`] returned by the operation counts against the circuit. An
//! [`Outcome::Failure`] is a domain-level answer (a "not found", a validation failure) and is
//! handed back to the caller like a success. See [`CircuitError`] for the ways a call can fail.
//!
//! # Time
//!
//! The breaker reads wall-clock time from an injected [`tick::Clock`]. Use
//! `tick::ClockControl` in tests to move time forward deterministically.
//!
//! # Features
//!
//! - `memory` (default): re-exports [`InMemoryStore`] and adds [`CircuitBreaker::in_memory`].
//! - `logs`: structured `tracing` events, see [`telemetry`].
//! - `metrics`: an OpenTelemetry event counter, see [`telemetry`].
//! - `serde`: serialization of [`BreakerConfig`] and [`CircuitState`].
//! - `test-util`: enables `fusebox_store::testing` and `tick`'s test clock.

mod breaker;
mod constants;
mod error;
mod operation;
pub mod telemetry;

#[doc(inline)]
pub use breaker::{BreakerConfig, CircuitBreaker, CircuitBreakerBuilder, CircuitSnapshot};
#[doc(inline)]
pub use error::{CircuitError, CircuitErrorKind, OperationError};
#[cfg(feature = "memory")]
#[doc(inline)]
pub use fusebox_memory::{InMemoryStore, InMemoryStoreBuilder};
#[doc(inline)]
pub use fusebox_store::{CircuitState, CircuitStore, Error as StoreError};
#[doc(inline)]
pub use operation::{AsyncOperation, Operation, Outcome};
