// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::SystemTime;

use fusebox_store::CircuitState;

/// A point-in-time view of everything stored for one target.
///
/// Returned by [`CircuitBreaker::snapshot`][crate::CircuitBreaker::snapshot]. Taking a
/// snapshot never changes the circuit, not even when its cooldown has already elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct CircuitSnapshot {
    /// The stored circuit state.
    pub state: CircuitState,

    /// The consecutive failure count.
    pub failure_count: u32,

    /// When the circuit last opened, if it ever did.
    pub last_opened: Option<SystemTime>,
}

impl CircuitSnapshot {
    /// Returns `true` if calls are currently being counted normally.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state == CircuitState::Closed
    }
}
