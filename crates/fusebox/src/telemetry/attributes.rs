// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Attribute keys attached to circuit breaker metrics and log events.
//!
//! Names follow the [OpenTelemetry naming guidelines](https://opentelemetry.io/docs/specs/semconv/general/naming/#general-naming-considerations):
//! keys are dot-separated and values are short `snake_case` labels.

/// Name of the breaker that emitted the event, as set by
/// [`CircuitBreakerBuilder::name`][crate::CircuitBreakerBuilder::name].
pub const BREAKER_NAME: &str = "breaker.name";

/// The protected target.
pub const CIRCUIT_TARGET: &str = "circuit.target";

/// The circuit event, for example `opened` or `probing`.
pub const CIRCUIT_EVENT: &str = "circuit.event";

/// The state of the circuit after the event.
pub const CIRCUIT_STATE: &str = "circuit.state";
