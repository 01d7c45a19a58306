// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory circuit store implementation using moka.

use std::time::SystemTime;

use fusebox_store::{CircuitState, CircuitStore, Error};
use moka::sync::Cache;

use crate::builder::InMemoryStoreBuilder;

#[derive(Debug, Default, Clone, Copy)]
struct Record {
    state: CircuitState,
    failures: u32,
    last_opened: Option<SystemTime>,
}

/// A circuit store that keeps every target in process memory.
///
/// Each target owns one record holding its state, failure count and last open time.
/// Every individual operation is atomic per target; clones share the same records.
///
/// The store never fails, so every [`CircuitStore`] method returns `Ok`.
///
/// # Examples
///
/// ```
/// use fusebox_memory::InMemoryStore;
/// use fusebox_store::{CircuitState, CircuitStore};
///
/// let store = InMemoryStore::new();
///
/// assert_eq!(store.state("billing")?, CircuitState::Closed);
///
/// store.increment_failure_count("billing")?;
/// assert_eq!(store.failure_count("billing")?, 1);
/// # Ok::<(), fusebox_store::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    records: Cache<String, Record>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates a new unbounded in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new in-memory store that tracks at most `max_capacity` targets.
    #[must_use]
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self::builder().max_capacity(max_capacity).build()
    }

    /// Creates a new builder for configuring an in-memory store.
    #[must_use]
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::new()
    }

    pub(crate) fn from_builder(builder: &InMemoryStoreBuilder) -> Self {
        let mut moka_builder = Cache::builder();

        if let Some(capacity) = builder.max_capacity {
            moka_builder = moka_builder.max_capacity(capacity);
        }

        if let Some(capacity) = builder.initial_capacity {
            moka_builder = moka_builder.initial_capacity(capacity);
        }

        if let Some(tti) = builder.time_to_idle {
            moka_builder = moka_builder.time_to_idle(tti);
        }

        if let Some(name) = builder.name.as_deref() {
            moka_builder = moka_builder.name(name);
        }

        Self {
            records: moka_builder.build(),
        }
    }

    /// Drops everything known about `target`, so it reads as a fresh closed circuit.
    ///
    /// # Examples
    ///
    /// ```
    /// use fusebox_memory::InMemoryStore;
    /// use fusebox_store::{CircuitState, CircuitStore};
    ///
    /// let store = InMemoryStore::new();
    /// store.save_state("billing", CircuitState::Open)?;
    ///
    /// store.forget("billing");
    /// assert_eq!(store.state("billing")?, CircuitState::Closed);
    /// # Ok::<(), fusebox_store::Error>(())
    /// ```
    pub fn forget(&self, target: &str) {
        self.records.invalidate(target);
    }

    /// Drops every tracked target.
    pub fn clear(&self) {
        self.records.invalidate_all();
    }

    /// Returns the approximate number of tracked targets.
    ///
    /// The count is eventually consistent with pending evictions and invalidations.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.records.run_pending_tasks();
        self.records.entry_count()
    }

    /// Returns `true` if no target is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self, target: &str) -> Record {
        self.records.get(target).unwrap_or_default()
    }

    fn update(&self, target: &str, apply: impl FnOnce(&mut Record)) {
        self.records.entry_by_ref(target).and_upsert_with(|existing| {
            let mut record = existing.map(|entry| entry.into_value()).unwrap_or_default();
            apply(&mut record);
            record
        });
    }
}

impl CircuitStore for InMemoryStore {
    fn state(&self, target: &str) -> Result<CircuitState, Error> {
        Ok(self.read(target).state)
    }

    fn save_state(&self, target: &str, state: CircuitState) -> Result<(), Error> {
        self.update(target, |record| record.state = state);
        Ok(())
    }

    fn failure_count(&self, target: &str) -> Result<u32, Error> {
        Ok(self.read(target).failures)
    }

    fn increment_failure_count(&self, target: &str) -> Result<(), Error> {
        self.update(target, |record| record.failures = record.failures.saturating_add(1));
        Ok(())
    }

    fn reset_failure_count(&self, target: &str) -> Result<(), Error> {
        self.update(target, |record| record.failures = 0);
        Ok(())
    }

    fn last_open_time(&self, target: &str) -> Result<Option<SystemTime>, Error> {
        Ok(self.read(target).last_opened)
    }

    fn set_last_open_time(&self, target: &str, time: SystemTime) -> Result<(), Error> {
        self.update(target, |record| record.last_opened = Some(time));
        Ok(())
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(InMemoryStore: Send, Sync, Clone, std::fmt::Debug, CircuitStore);

    #[test]
    fn update_preserves_other_fields() {
        let store = InMemoryStore::new();
        let opened = SystemTime::UNIX_EPOCH;

        store.save_state("a", CircuitState::Open).unwrap();
        store.set_last_open_time("a", opened).unwrap();
        store.increment_failure_count("a").unwrap();

        let record = store.read("a");
        assert_eq!(record.state, CircuitState::Open);
        assert_eq!(record.failures, 1);
        assert_eq!(record.last_opened, Some(opened));
    }

    #[test]
    fn reads_do_not_create_records() {
        let store = InMemoryStore::new();

        store.state("ghost").unwrap();
        store.failure_count("ghost").unwrap();

        assert!(store.is_empty());
    }

    #[test]
    fn failure_count_saturates() {
        let store = InMemoryStore::new();
        store.update("a", |record| record.failures = u32::MAX);

        store.increment_failure_count("a").unwrap();

        assert_eq!(store.failure_count("a").unwrap(), u32::MAX);
    }
}
