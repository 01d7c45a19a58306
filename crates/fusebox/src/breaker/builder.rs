// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::time::Duration;

use fusebox_store::CircuitStore;
use tick::Clock;

use super::{BreakerOptions, CircuitBreaker};
use crate::BreakerConfig;
use crate::constants::{DEFAULT_BREAKER_NAME, DEFAULT_COOLDOWN, DEFAULT_FAILURE_THRESHOLD, MIN_FAILURE_THRESHOLD};
use crate::telemetry::Telemetry;

/// Builder for a [`CircuitBreaker`].
///
/// Created by [`CircuitBreaker::builder`]. Everything except the store and the clock has a
/// default:
///
/// | Setting | Default |
/// |---|---|
/// | [`failure_threshold`][Self::failure_threshold] | 3 |
/// | [`cooldown`][Self::cooldown] | 5 seconds |
/// | [`name`][Self::name] | `"default"` |
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use fusebox::{CircuitBreaker, InMemoryStore};
/// use tick::Clock;
///
/// # fn build(clock: &Clock) {
/// let breaker = CircuitBreaker::builder(InMemoryStore::new(), clock)
///     .failure_threshold(5)
///     .cooldown(Duration::from_secs(30))
///     .name("payments")
///     .build();
/// # }
/// ```
#[derive(Debug)]
pub struct CircuitBreakerBuilder<S> {
    store: S,
    clock: Clock,
    failure_threshold: u32,
    cooldown: Duration,
    telemetry: Telemetry,
}

impl<S: CircuitStore> CircuitBreakerBuilder<S> {
    pub(super) fn new(store: S, clock: Clock) -> Self {
        Self {
            store,
            clock,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            cooldown: DEFAULT_COOLDOWN,
            telemetry: Telemetry::new(Cow::Borrowed(DEFAULT_BREAKER_NAME)),
        }
    }

    /// Sets how many consecutive failures open the circuit.
    ///
    /// A threshold of zero is treated as one: a single failure opens the circuit.
    #[must_use]
    pub fn failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold.max(MIN_FAILURE_THRESHOLD);
        self
    }

    /// Sets how long the circuit stays open before a probe call is allowed.
    ///
    /// A zero cooldown lets the very next call after opening act as the probe.
    #[must_use]
    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Sets the name reported in telemetry for this breaker.
    #[must_use]
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.telemetry.breaker_name = name.into();
        self
    }

    /// Applies the threshold and cooldown from `config`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use fusebox::{BreakerConfig, CircuitBreaker, InMemoryStore};
    /// use tick::Clock;
    ///
    /// # fn build(clock: &Clock) {
    /// let config = BreakerConfig {
    ///     failure_threshold: 10,
    ///     cooldown: Duration::from_secs(60),
    /// };
    ///
    /// let breaker = CircuitBreaker::builder(InMemoryStore::new(), clock)
    ///     .config(&config)
    ///     .build();
    ///
    /// assert_eq!(breaker.failure_threshold(), 10);
    /// # }
    /// ```
    #[must_use]
    pub fn config(self, config: &BreakerConfig) -> Self {
        self.failure_threshold(config.failure_threshold).cooldown(config.cooldown)
    }

    /// Enables structured `tracing` events for every circuit event.
    #[must_use]
    #[cfg(any(feature = "logs", test))]
    pub fn enable_logs(mut self) -> Self {
        self.telemetry.logs_enabled = true;
        self
    }

    /// Enables the `circuit.event` counter on the given OpenTelemetry meter provider.
    #[must_use]
    #[cfg(any(feature = "metrics", test))]
    pub fn enable_metrics(mut self, provider: &dyn opentelemetry::metrics::MeterProvider) -> Self {
        let meter = crate::telemetry::metrics::create_meter(provider);
        self.telemetry.event_reporter = Some(crate::telemetry::metrics::create_event_counter(&meter));
        self
    }

    /// Builds the circuit breaker.
    #[must_use]
    pub fn build(self) -> CircuitBreaker<S> {
        CircuitBreaker {
            store: self.store,
            clock: self.clock,
            options: BreakerOptions {
                failure_threshold: self.failure_threshold,
                cooldown: self.cooldown,
            },
            telemetry: self.telemetry,
        }
    }
}
