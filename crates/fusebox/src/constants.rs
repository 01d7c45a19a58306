// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

/// Default number of consecutive failures that opens the circuit.
pub(crate) const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// Default time the circuit stays open before a probe is allowed.
pub(crate) const DEFAULT_COOLDOWN: Duration = Duration::from_secs(5);

/// Default breaker name reported in telemetry.
pub(crate) const DEFAULT_BREAKER_NAME: &str = "default";

/// Smallest accepted failure threshold; lower values are clamped to it.
pub(crate) const MIN_FAILURE_THRESHOLD: u32 = 1;
