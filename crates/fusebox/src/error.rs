// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types raised by protected operations and by the circuit breaker.

use ohno::ErrorExt;
use recoverable::{Recovery, RecoveryInfo};

/// An error raised by a protected operation.
///
/// Returning this error from an [`Operation`][crate::Operation] counts as a failure of the
/// target. Domain-level failures that should not trip the circuit belong in
/// [`Outcome::Failure`][crate::Outcome::Failure] instead.
///
/// The error optionally carries [`RecoveryInfo`] describing whether the operation is worth
/// retrying. It defaults to [`RecoveryInfo::unknown()`].
///
/// # Examples
///
/// ```
/// use fusebox::OperationError;
/// use recoverable::{Recovery, RecoveryInfo, RecoveryKind};
///
/// let error = OperationError::from_message(std::io::Error::other("connection refused"))
///     .with_recovery(RecoveryInfo::retry());
///
/// assert_eq!(error.recovery().kind(), RecoveryKind::Retry);
/// ```
#[ohno::error]
pub struct OperationError {
    recovery: RecoveryInfo,
}

impl OperationError {
    /// Creates a new operation error from any type that can be converted to an error.
    pub fn from_message(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(RecoveryInfo::unknown(), cause)
    }

    /// Replaces the recovery information carried by this error.
    #[must_use]
    pub fn with_recovery(mut self, recovery: RecoveryInfo) -> Self {
        self.recovery = recovery;
        self
    }
}

impl Recovery for OperationError {
    fn recovery(&self) -> RecoveryInfo {
        self.recovery.clone()
    }
}

/// The category of a [`CircuitError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CircuitErrorKind {
    /// The circuit is open: either the call was rejected without being attempted, or the call
    /// failed and crossed the failure threshold.
    Open,

    /// The half-open probe failed and the circuit has been reopened.
    HalfOpen,

    /// The operation failed but the circuit is still closed.
    Operation,

    /// The circuit store could not complete an operation.
    Storage,
}

/// An error returned by [`CircuitBreaker::call`][crate::CircuitBreaker::call].
///
/// The variants let callers tell apart the four ways a call can fail:
///
/// | Variant | Kind | Operation attempted |
/// |---|---|---|
/// | [`Rejected`][Self::Rejected] | [`Open`][CircuitErrorKind::Open] | no |
/// | [`Tripped`][Self::Tripped] | [`Open`][CircuitErrorKind::Open] | yes, and it opened the circuit |
/// | [`ProbeFailed`][Self::ProbeFailed] | [`HalfOpen`][CircuitErrorKind::HalfOpen] | yes, as the probe |
/// | [`Operation`][Self::Operation] | [`Operation`][CircuitErrorKind::Operation] | yes, circuit still closed |
///
/// Storage failures surface as [`Storage`][Self::Storage] and are never recovered from.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CircuitError {
    /// The circuit is open and still cooling down; the operation was not executed.
    #[error("circuit is open for {target}")]
    Rejected {
        /// The protected target.
        target: String,
    },

    /// The operation failed and this failure reached the threshold, opening the circuit.
    #[error("circuit is open for {target}: {}", .cause.message())]
    Tripped {
        /// The protected target.
        target: String,
        /// The failure that opened the circuit.
        #[source]
        cause: OperationError,
    },

    /// The half-open probe failed and the circuit has been reopened.
    #[error("half-open probe failed for {target}: {}", .cause.message())]
    ProbeFailed {
        /// The protected target.
        target: String,
        /// The failure of the probe.
        #[source]
        cause: OperationError,
    },

    /// The operation failed below the threshold; this is the original error, unchanged.
    #[error(transparent)]
    Operation(OperationError),

    /// The circuit store failed.
    #[error(transparent)]
    Storage(#[from] fusebox_store::Error),
}

impl CircuitError {
    /// Returns the category of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use fusebox::{CircuitError, CircuitErrorKind};
    ///
    /// let error = CircuitError::Rejected {
    ///     target: "billing".to_string(),
    /// };
    ///
    /// assert_eq!(error.kind(), CircuitErrorKind::Open);
    /// ```
    #[must_use]
    pub fn kind(&self) -> CircuitErrorKind {
        match self {
            Self::Rejected { .. } | Self::Tripped { .. } => CircuitErrorKind::Open,
            Self::ProbeFailed { .. } => CircuitErrorKind::HalfOpen,
            Self::Operation(_) => CircuitErrorKind::Operation,
            Self::Storage(_) => CircuitErrorKind::Storage,
        }
    }

    /// Returns the target this error was raised for, if known.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Rejected { target } | Self::Tripped { target, .. } | Self::ProbeFailed { target, .. } => Some(target),
            Self::Operation(_) | Self::Storage(_) => None,
        }
    }

    /// Returns the operation error behind this error, if the operation was attempted.
    #[must_use]
    pub fn operation_error(&self) -> Option<&OperationError> {
        match self {
            Self::Tripped { cause, .. } | Self::ProbeFailed { cause, .. } | Self::Operation(cause) => Some(cause),
            Self::Rejected { .. } | Self::Storage(_) => None,
        }
    }

    /// Returns `true` if the operation was not executed at all.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

impl Recovery for CircuitError {
    fn recovery(&self) -> RecoveryInfo {
        match self {
            Self::Rejected { .. } | Self::Tripped { .. } | Self::ProbeFailed { .. } => RecoveryInfo::unavailable(),
            Self::Operation(cause) => cause.recovery(),
            Self::Storage(_) => RecoveryInfo::unknown(),
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use recoverable::RecoveryKind;
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(OperationError: Send, Sync, std::error::Error);
    assert_impl_all!(CircuitError: Send, Sync, std::error::Error, From<fusebox_store::Error>);

    fn cause() -> OperationError {
        OperationError::from_message("connection refused")
    }

    #[test]
    fn operation_error_defaults_to_unknown_recovery() {
        assert_eq!(cause().recovery().kind(), RecoveryKind::Unknown);
        assert_eq!(cause().with_recovery(RecoveryInfo::never()).recovery().kind(), RecoveryKind::Never);
    }

    #[test]
    fn rejected_display() {
        let error = CircuitError::Rejected { target: "svc".to_string() };

        assert_eq!(error.to_string(), "circuit is open for svc");
        assert_eq!(error.kind(), CircuitErrorKind::Open);
        assert!(error.is_rejected());
        assert!(error.source().is_none());
    }

    #[test]
    fn tripped_display_embeds_cause_message() {
        let error = CircuitError::Tripped {
            target: "svc".to_string(),
            cause: cause(),
        };

        let display = error.to_string();
        assert!(display.starts_with("circuit is open for svc: "), "got: {display}");
        assert!(display.contains("connection refused"), "got: {display}");
        assert_eq!(error.kind(), CircuitErrorKind::Open);
        assert!(!error.is_rejected());
        assert!(error.source().is_some());
    }

    #[test]
    fn probe_failed_display_embeds_cause_message() {
        let error = CircuitError::ProbeFailed {
            target: "svc".to_string(),
            cause: cause(),
        };

        let display = error.to_string();
        assert!(display.starts_with("half-open probe failed for svc: "), "got: {display}");
        assert!(display.contains("connection refused"), "got: {display}");
        assert_eq!(error.kind(), CircuitErrorKind::HalfOpen);
    }

    #[test]
    fn operation_is_transparent() {
        let error = CircuitError::Operation(cause());

        assert!(error.to_string().contains("connection refused"));
        assert!(!error.to_string().contains("circuit is open"));
        assert_eq!(error.kind(), CircuitErrorKind::Operation);
        assert!(error.target().is_none());
        assert!(error.operation_error().is_some());
    }

    #[test]
    fn storage_converts_from_store_error() {
        let error: CircuitError = fusebox_store::Error::from_message("backend down").into();

        assert_eq!(error.kind(), CircuitErrorKind::Storage);
        assert!(error.to_string().contains("backend down"));
        assert!(error.operation_error().is_none());
    }

    #[test]
    fn target_accessor() {
        let error = CircuitError::ProbeFailed {
            target: "svc".to_string(),
            cause: cause(),
        };

        assert_eq!(error.target(), Some("svc"));
    }

    #[test]
    fn recovery_classification() {
        let rejected = CircuitError::Rejected { target: "svc".to_string() };
        let tripped = CircuitError::Tripped {
            target: "svc".to_string(),
            cause: cause(),
        };
        let operation = CircuitError::Operation(cause().with_recovery(RecoveryInfo::retry()));
        let storage = CircuitError::Storage(fusebox_store::Error::from_message("down"));

        assert_eq!(rejected.recovery().kind(), RecoveryKind::Unavailable);
        assert_eq!(tripped.recovery().kind(), RecoveryKind::Unavailable);
        assert_eq!(operation.recovery().kind(), RecoveryKind::Retry);
        assert_eq!(storage.recovery().kind(), RecoveryKind::Unknown);
    }
}
