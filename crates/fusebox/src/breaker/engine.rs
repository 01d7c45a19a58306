// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

use fusebox_store::{CircuitState, CircuitStore};

use super::CircuitBreaker;
use crate::telemetry::CircuitEvent;
use crate::{CircuitError, OperationError, Outcome};

/// How an admitted call is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExecutionMode {
    /// The circuit is closed; failures are counted.
    Normal,

    /// The circuit is half-open and this call is the probe.
    Probe,
}

impl<S: CircuitStore> CircuitBreaker<S> {
    /// Decides whether a call for `target` may run, moving an open circuit whose cooldown has
    /// elapsed to half-open first.
    pub(super) fn enter(&self, target: &str) -> Result<ExecutionMode, CircuitError> {
        if self.store.state(target)? == CircuitState::Open {
            self.evaluate_cooldown(target)?;
        }

        // The state is re-read after the cooldown check, so this very call may take the probe.
        match self.store.state(target)? {
            CircuitState::Closed => Ok(ExecutionMode::Normal),
            CircuitState::HalfOpen => Ok(ExecutionMode::Probe),
            CircuitState::Open => {
                self.telemetry.report(CircuitEvent::Rejected, target, None);

                Err(CircuitError::Rejected {
                    target: target.to_string(),
                })
            }
        }
    }

    /// Records the result of an admitted call and maps it to what the caller sees.
    pub(super) fn exit<T>(
        &self,
        target: &str,
        mode: ExecutionMode,
        result: Result<Outcome<T>, OperationError>,
    ) -> Result<Outcome<T>, CircuitError> {
        match (mode, result) {
            (ExecutionMode::Probe, Ok(outcome)) => {
                self.store.save_state(target, CircuitState::Closed)?;
                self.store.reset_failure_count(target)?;
                self.telemetry.report(CircuitEvent::Closed, target, None);

                Ok(outcome)
            }
            (ExecutionMode::Probe, Err(cause)) => {
                // A failed probe reopens without touching the failure count.
                self.open(target)?;
                self.telemetry.report(CircuitEvent::Reopened, target, None);

                Err(CircuitError::ProbeFailed {
                    target: target.to_string(),
                    cause,
                })
            }
            (ExecutionMode::Normal, Ok(outcome)) => {
                self.store.reset_failure_count(target)?;

                Ok(outcome)
            }
            (ExecutionMode::Normal, Err(cause)) => {
                self.store.increment_failure_count(target)?;
                let failures = self.store.failure_count(target)?;

                if failures < self.options.failure_threshold {
                    return Err(CircuitError::Operation(cause));
                }

                self.open(target)?;
                self.telemetry.report(CircuitEvent::Opened, target, Some(failures));

                Err(CircuitError::Tripped {
                    target: target.to_string(),
                    cause,
                })
            }
        }
    }

    fn evaluate_cooldown(&self, target: &str) -> Result<(), CircuitError> {
        let now = self.clock.system_time();

        match self.store.last_open_time(target)? {
            // Opened by someone who never recorded a timestamp; start the cooldown now.
            None => self.store.set_last_open_time(target, now)?,
            Some(opened) => {
                // A timestamp from the future (clock skew between processes) counts as zero elapsed.
                let elapsed = now.duration_since(opened).unwrap_or(Duration::ZERO);

                if elapsed >= self.options.cooldown {
                    self.store.save_state(target, CircuitState::HalfOpen)?;
                    self.telemetry.report(CircuitEvent::Probing, target, None);
                }
            }
        }

        Ok(())
    }

    fn open(&self, target: &str) -> Result<(), CircuitError> {
        self.store.save_state(target, CircuitState::Open)?;
        self.store.set_last_open_time(target, self.clock.system_time())?;
        Ok(())
    }
}
