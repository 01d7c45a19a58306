// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Display};

/// The state of the circuit for a single target.
///
/// ```text
/// ┌────────┐      Failure threshold reached       ┌──────────┐
/// │ Closed │ ────────────────────────────────────▶│   Open   │
/// └────────┘                                      └──────────┘
///      ▲                                            ▲     │
///      │                                   Probe    │     │
///      │            ┌────────────────┐     failed   │     │
///      └────────────│   Half-Open    │──────────────┘     │
///      Probe        └────────────────┘◀───────────────────┘
///      succeeded                          Cooldown elapsed
/// ```
///
/// Unknown targets are [`Closed`][CircuitState::Closed], which is also the [`Default`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CircuitState {
    /// Calls are permitted and failures are counted.
    #[default]
    Closed,

    /// Calls are rejected without being attempted until the cooldown elapses.
    Open,

    /// A single trial call is permitted; its outcome decides the next state.
    HalfOpen,
}

impl CircuitState {
    /// Returns a short `snake_case` label suitable for logs and metric attributes.
    ///
    /// # Examples
    ///
    /// ```
    /// use fusebox_store::CircuitState;
    ///
    /// assert_eq!(CircuitState::HalfOpen.as_str(), "half_open");
    /// ```
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }
}

impl Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
