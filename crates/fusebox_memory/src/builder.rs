// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring in-memory circuit stores.
//!
//! This module provides a builder API for `InMemoryStore` that hides the underlying
//! moka configuration, keeping moka types out of the public API.

use std::time::Duration;

use crate::store::InMemoryStore;

/// Builder for configuring an [`InMemoryStore`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use fusebox_memory::InMemoryStore;
///
/// let store = InMemoryStore::builder()
///     .max_capacity(10_000)
///     .time_to_idle(Duration::from_secs(3600))
///     .initial_capacity(64)
///     .name("circuits")
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStoreBuilder {
    pub(crate) max_capacity: Option<u64>,
    pub(crate) initial_capacity: Option<usize>,
    pub(crate) time_to_idle: Option<Duration>,
    pub(crate) name: Option<String>,
}

impl InMemoryStoreBuilder {
    /// Creates a new builder with default settings.
    ///
    /// The default configuration keeps every target until it is forgotten or cleared.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of targets tracked by the store.
    ///
    /// Once the capacity is reached, the least valuable targets are evicted. An evicted
    /// target reads as a closed circuit with zero failures the next time it is seen, so
    /// pick a capacity well above the number of targets you expect to guard.
    #[must_use]
    pub fn max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Sets the initial capacity (pre-allocation hint) for the store.
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Sets the time-to-idle for tracked targets.
    ///
    /// A target that is neither read nor written for this long is dropped and reads as
    /// closed afterwards. The idle period should comfortably exceed the breaker cooldown,
    /// otherwise an open circuit may silently close while nobody is calling it.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use fusebox_memory::InMemoryStore;
    ///
    /// let store = InMemoryStore::builder()
    ///     .time_to_idle(Duration::from_secs(15 * 60))
    ///     .build();
    /// ```
    #[must_use]
    pub fn time_to_idle(mut self, duration: Duration) -> Self {
        self.time_to_idle = Some(duration);
        self
    }

    /// Sets a name for the store, which may appear in debugging output of the
    /// underlying cache.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds the configured [`InMemoryStore`].
    #[must_use]
    pub fn build(self) -> InMemoryStore {
        InMemoryStore::from_builder(&self)
    }
}
