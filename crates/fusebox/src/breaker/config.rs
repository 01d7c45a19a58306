// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

use crate::constants::{DEFAULT_COOLDOWN, DEFAULT_FAILURE_THRESHOLD};

/// Plain configuration for a circuit breaker.
///
/// Apply it with [`CircuitBreakerBuilder::config`][crate::CircuitBreakerBuilder::config].
/// With the `serde` feature the type can be loaded from configuration files; missing fields
/// fall back to their defaults and `cooldown` uses the ISO 8601 duration format (`"PT5S"`).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use fusebox::BreakerConfig;
///
/// let config = BreakerConfig::default();
///
/// assert_eq!(config.failure_threshold, 3);
/// assert_eq!(config.cooldown, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BreakerConfig {
    /// Consecutive failures that open the circuit. Zero is treated as one.
    pub failure_threshold: u32,

    /// How long the circuit stays open before a probe is allowed.
    #[cfg_attr(feature = "serde", serde(with = "iso_duration"))]
    pub cooldown: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

#[cfg(feature = "serde")]
mod iso_duration {
    use std::time::Duration;

    use jiff::SignedDuration;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        SignedDuration::try_from(*value).map_err(S::Error::custom)?.serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let value = SignedDuration::deserialize(deserializer)?;
        Duration::try_from(value).map_err(D::Error::custom)
    }
}
