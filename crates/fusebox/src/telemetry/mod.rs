// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! # Circuit Breaker Telemetry
//!
//! Every state transition of a circuit, and every rejected call, is reported as a
//! circuit event. Events are emitted as:
//!
//! - structured `tracing` events when the `logs` feature is enabled and
//!   [`enable_logs`][crate::CircuitBreakerBuilder::enable_logs] is called;
//! - increments of the `circuit.event` counter (meter `fusebox`) when the `metrics` feature is
//!   enabled and [`enable_metrics`][crate::CircuitBreakerBuilder::enable_metrics] is called.
//!
//! | Event | Log event name | Level | State after |
//! |---|---|---|---|
//! | `rejected` | `fusebox.circuit.rejected` | WARN | `open` |
//! | `opened` | `fusebox.circuit.opened` | WARN | `open` |
//! | `probing` | `fusebox.circuit.probing` | INFO | `half_open` |
//! | `closed` | `fusebox.circuit.closed` | INFO | `closed` |
//! | `reopened` | `fusebox.circuit.reopened` | WARN | `open` |
//!
//! The attribute keys are listed in [`attributes`].

use std::borrow::Cow;

#[cfg(any(feature = "logs", feature = "metrics", test))]
use fusebox_store::CircuitState;

pub mod attributes;
#[cfg(any(feature = "metrics", test))]
pub(crate) mod metrics;
#[cfg(test)]
pub(crate) mod testing;

/// A circuit event reported through telemetry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum CircuitEvent {
    /// A call was rejected because the circuit is open.
    Rejected,
    /// The failure threshold was reached and the circuit opened.
    Opened,
    /// The cooldown elapsed and the circuit moved to half-open.
    Probing,
    /// The probe succeeded and the circuit closed.
    Closed,
    /// The probe failed and the circuit opened again.
    Reopened,
}

#[cfg(any(feature = "logs", feature = "metrics", test))]
impl CircuitEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rejected => "rejected",
            Self::Opened => "opened",
            Self::Probing => "probing",
            Self::Closed => "closed",
            Self::Reopened => "reopened",
        }
    }

    /// The state of the circuit once the event has happened.
    pub fn state(self) -> CircuitState {
        match self {
            Self::Rejected | Self::Opened | Self::Reopened => CircuitState::Open,
            Self::Probing => CircuitState::HalfOpen,
            Self::Closed => CircuitState::Closed,
        }
    }
}

/// Per-breaker telemetry sinks.
#[derive(Debug, Clone)]
pub(crate) struct Telemetry {
    pub(crate) breaker_name: Cow<'static, str>,
    #[cfg(any(feature = "metrics", test))]
    pub(crate) event_reporter: Option<opentelemetry::metrics::Counter<u64>>,
    #[cfg(any(feature = "logs", test))]
    pub(crate) logs_enabled: bool,
}

impl Telemetry {
    pub(crate) fn new(breaker_name: Cow<'static, str>) -> Self {
        Self {
            breaker_name,
            #[cfg(any(feature = "metrics", test))]
            event_reporter: None,
            #[cfg(any(feature = "logs", test))]
            logs_enabled: false,
        }
    }

    /// Reports `event` for `target`. `failure_count` is attached to log events when known.
    pub(crate) fn report(&self, event: CircuitEvent, target: &str, failure_count: Option<u32>) {
        #[cfg(any(feature = "metrics", test))]
        if let Some(reporter) = &self.event_reporter {
            reporter.add(
                1,
                &[
                    opentelemetry::KeyValue::new(attributes::BREAKER_NAME, self.breaker_name.clone()),
                    opentelemetry::KeyValue::new(attributes::CIRCUIT_TARGET, target.to_string()),
                    opentelemetry::KeyValue::new(attributes::CIRCUIT_EVENT, event.as_str()),
                    opentelemetry::KeyValue::new(attributes::CIRCUIT_STATE, event.state().as_str()),
                ],
            );
        }

        #[cfg(any(feature = "logs", test))]
        if self.logs_enabled {
            self.log(event, target, failure_count);
        }

        _ = (event, target, failure_count);
    }

    #[cfg(any(feature = "logs", test))]
    fn log(&self, event: CircuitEvent, target: &str, failure_count: Option<u32>) {
        let breaker_name = &self.breaker_name;

        macro_rules! circuit_event {
            ($name:literal, $level:expr) => {
                tracing::event!(
                    name: $name,
                    $level,
                    breaker.name = %breaker_name,
                    circuit.target = target,
                    circuit.state = event.state().as_str(),
                    circuit.event = event.as_str(),
                    circuit.failure_count = failure_count,
                )
            };
        }

        match event {
            CircuitEvent::Rejected => circuit_event!("fusebox.circuit.rejected", tracing::Level::WARN),
            CircuitEvent::Opened => circuit_event!("fusebox.circuit.opened", tracing::Level::WARN),
            CircuitEvent::Probing => circuit_event!("fusebox.circuit.probing", tracing::Level::INFO),
            CircuitEvent::Closed => circuit_event!("fusebox.circuit.closed", tracing::Level::INFO),
            CircuitEvent::Reopened => circuit_event!("fusebox.circuit.reopened", tracing::Level::WARN),
        }
    }
}
