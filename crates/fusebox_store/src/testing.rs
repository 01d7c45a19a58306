// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mock circuit store for testing.
//!
//! This module provides `MockStore`, an in-memory store that records all operations
//! and supports failure injection for testing error paths.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::Mutex;

use crate::{CircuitState, CircuitStore, Error};

/// Recorded store operation with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// The state of the given target was read.
    State(String),
    /// The state of a target was overwritten.
    SaveState {
        /// The target whose state was written.
        target: String,
        /// The state that was written.
        state: CircuitState,
    },
    /// The failure count of the given target was read.
    FailureCount(String),
    /// The failure count of the given target was incremented.
    IncrementFailureCount(String),
    /// The failure count of the given target was reset.
    ResetFailureCount(String),
    /// The last open time of the given target was read.
    LastOpenTime(String),
    /// The last open time of a target was written.
    SetLastOpenTime {
        /// The target whose open time was written.
        target: String,
        /// The time that was written.
        time: SystemTime,
    },
}

impl StoreOp {
    /// Returns `true` for operations that mutate the store.
    #[must_use]
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::SaveState { .. } | Self::IncrementFailureCount(_) | Self::ResetFailureCount(_) | Self::SetLastOpenTime { .. }
        )
    }
}

type FailPredicate = Box<dyn Fn(&StoreOp) -> bool + Send + Sync>;

#[derive(Debug, Default)]
struct Tables {
    states: HashMap<String, CircuitState>,
    failures: HashMap<String, u32>,
    opened_at: HashMap<String, SystemTime>,
}

/// A configurable mock circuit store for testing.
///
/// The store keeps state, failure counts and open times in separate maps and
/// can be configured to fail operations on demand. All operations are recorded for
/// later verification. Clones share the same data.
///
/// # Examples
///
/// ```
/// use fusebox_store::testing::{MockStore, StoreOp};
/// use fusebox_store::{CircuitState, CircuitStore};
///
/// let store = MockStore::new();
///
/// store.save_state("billing", CircuitState::Open)?;
/// assert_eq!(store.state("billing")?, CircuitState::Open);
///
/// assert_eq!(
///     store.operations(),
///     vec![
///         StoreOp::SaveState {
///             target: "billing".to_string(),
///             state: CircuitState::Open
///         },
///         StoreOp::State("billing".to_string()),
///     ]
/// );
/// # Ok::<(), fusebox_store::Error>(())
/// ```
///
/// # Failure Injection
///
/// ```
/// use fusebox_store::testing::{MockStore, StoreOp};
/// use fusebox_store::CircuitStore;
///
/// let store = MockStore::new();
///
/// // Fail every write
/// store.fail_when(StoreOp::is_write);
/// assert!(store.reset_failure_count("billing").is_err());
/// assert!(store.failure_count("billing").is_ok());
///
/// // Fail only reads of a specific target
/// store.fail_when(|op| matches!(op, StoreOp::State(t) if t == "forbidden"));
/// assert!(store.state("forbidden").is_err());
/// assert!(store.state("allowed").is_ok());
/// ```
#[derive(Clone, Default)]
pub struct MockStore {
    tables: Arc<Mutex<Tables>>,
    operations: Arc<Mutex<Vec<StoreOp>>>,
    fail_when: Arc<Mutex<Option<FailPredicate>>>,
}

impl std::fmt::Debug for MockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("tables", &self.tables)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl MockStore {
    /// Creates a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a predicate that determines when operations should fail.
    ///
    /// The predicate receives the operation and returns `true` if it should fail.
    /// Failed operations are still recorded but leave the data untouched.
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp> {
        self.operations.lock().clone()
    }

    /// Returns only the recorded operations that mutated the store.
    #[must_use]
    pub fn writes(&self) -> Vec<StoreOp> {
        self.operations.lock().iter().filter(|op| op.is_write()).cloned().collect()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    fn run<R>(&self, op: StoreOp, apply: impl FnOnce(&mut Tables) -> R) -> Result<R, Error> {
        let fail = self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(&op));
        let label = format!("mock: {op:?} failed");
        self.operations.lock().push(op);

        if fail {
            return Err(Error::from_message(label));
        }

        Ok(apply(&mut self.tables.lock()))
    }
}

impl CircuitStore for MockStore {
    fn state(&self, target: &str) -> Result<CircuitState, Error> {
        self.run(StoreOp::State(target.to_string()), |t| {
            t.states.get(target).copied().unwrap_or_default()
        })
    }

    fn save_state(&self, target: &str, state: CircuitState) -> Result<(), Error> {
        let op = StoreOp::SaveState {
            target: target.to_string(),
            state,
        };
        self.run(op, |t| {
            t.states.insert(target.to_string(), state);
        })
    }

    fn failure_count(&self, target: &str) -> Result<u32, Error> {
        self.run(StoreOp::FailureCount(target.to_string()), |t| {
            t.failures.get(target).copied().unwrap_or_default()
        })
    }

    fn increment_failure_count(&self, target: &str) -> Result<(), Error> {
        self.run(StoreOp::IncrementFailureCount(target.to_string()), |t| {
            let count = t.failures.entry(target.to_string()).or_default();
            *count = count.saturating_add(1);
        })
    }

    fn reset_failure_count(&self, target: &str) -> Result<(), Error> {
        self.run(StoreOp::ResetFailureCount(target.to_string()), |t| {
            t.failures.insert(target.to_string(), 0);
        })
    }

    fn last_open_time(&self, target: &str) -> Result<Option<SystemTime>, Error> {
        self.run(StoreOp::LastOpenTime(target.to_string()), |t| t.opened_at.get(target).copied())
    }

    fn set_last_open_time(&self, target: &str, time: SystemTime) -> Result<(), Error> {
        let op = StoreOp::SetLastOpenTime {
            target: target.to_string(),
            time,
        };
        self.run(op, |t| {
            t.opened_at.insert(target.to_string(), time);
        })
    }
}
