// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The core trait for circuit state backends.
//!
//! [`CircuitStore`] defines the interface that all circuit backends must implement.
//! Implement the plain data access here, then hand the store to a `fusebox` circuit
//! breaker which owns every transition decision.

use std::sync::Arc;
use std::time::SystemTime;

use crate::{CircuitState, Error};

/// Trait for circuit state storage backends.
///
/// Every method is keyed by an opaque target string and must treat unknown targets as
/// a closed circuit with zero failures and no recorded open time. No method carries any
/// decision logic; the circuit breaker is the only writer.
///
/// # Atomicity
///
/// The breaker reads, decides and writes through several separate calls, and this
/// contract does not make that sequence atomic. Backends shared by concurrent callers
/// should serialize access per target if they need stronger guarantees than
/// "each individual method is atomic".
///
/// # Errors
///
/// Backends that can fail (network or database backed ones) surface an [`Error`].
/// The breaker never recovers from a store error; it propagates it to the caller.
pub trait CircuitStore: Send + Sync {
    /// Returns the circuit state for `target`, or [`CircuitState::Closed`] if unknown.
    fn state(&self, target: &str) -> Result<CircuitState, Error>;

    /// Unconditionally overwrites the circuit state for `target`.
    fn save_state(&self, target: &str, state: CircuitState) -> Result<(), Error>;

    /// Returns the consecutive failure count for `target`, or `0` if unknown.
    fn failure_count(&self, target: &str) -> Result<u32, Error>;

    /// Increments the consecutive failure count for `target` by one.
    fn increment_failure_count(&self, target: &str) -> Result<(), Error>;

    /// Resets the consecutive failure count for `target` to zero.
    fn reset_failure_count(&self, target: &str) -> Result<(), Error>;

    /// Returns the time the circuit for `target` last opened, or `None` if it never did.
    fn last_open_time(&self, target: &str) -> Result<Option<SystemTime>, Error>;

    /// Records the time the circuit for `target` opened.
    fn set_last_open_time(&self, target: &str, time: SystemTime) -> Result<(), Error>;
}

macro_rules! forward_circuit_store {
    ($($ty:ty),+) => {
        $(
            impl<S: CircuitStore + ?Sized> CircuitStore for $ty {
                fn state(&self, target: &str) -> Result<CircuitState, Error> {
                    (**self).state(target)
                }

                fn save_state(&self, target: &str, state: CircuitState) -> Result<(), Error> {
                    (**self).save_state(target, state)
                }

                fn failure_count(&self, target: &str) -> Result<u32, Error> {
                    (**self).failure_count(target)
                }

                fn increment_failure_count(&self, target: &str) -> Result<(), Error> {
                    (**self).increment_failure_count(target)
                }

                fn reset_failure_count(&self, target: &str) -> Result<(), Error> {
                    (**self).reset_failure_count(target)
                }

                fn last_open_time(&self, target: &str) -> Result<Option<SystemTime>, Error> {
                    (**self).last_open_time(target)
                }

                fn set_last_open_time(&self, target: &str, time: SystemTime) -> Result<(), Error> {
                    (**self).set_last_open_time(target, time)
                }
            }
        )+
    };
}

forward_circuit_store!(Arc<S>, Box<S>, &S);
