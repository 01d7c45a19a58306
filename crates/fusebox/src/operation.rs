// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The unit of work protected by a circuit breaker.

use crate::OperationError;

/// The result of an operation that completed without raising an [`OperationError`].
///
/// Both variants carry an arbitrary payload. A [`Failure`][Outcome::Failure] is a
/// domain-level result (for example, a "not found" response) and does not count against
/// the circuit; only an [`OperationError`] does.
///
/// # Examples
///
/// ```
/// use fusebox::Outcome;
///
/// let outcome = Outcome::failure("not found");
///
/// assert!(!outcome.is_success());
/// assert_eq!(*outcome.payload(), "not found");
/// assert_eq!(outcome.into_result(), Err("not found"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome<T> {
    /// The operation succeeded.
    Success(T),

    /// The operation completed with a domain-level failure.
    Failure(T),
}

impl<T> Outcome<T> {
    /// Creates a successful outcome.
    #[must_use]
    pub fn success(payload: T) -> Self {
        Self::Success(payload)
    }

    /// Creates a failed outcome.
    #[must_use]
    pub fn failure(payload: T) -> Self {
        Self::Failure(payload)
    }

    /// Returns `true` for [`Outcome::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns a reference to the payload regardless of the variant.
    #[must_use]
    pub fn payload(&self) -> &T {
        match self {
            Self::Success(payload) | Self::Failure(payload) => payload,
        }
    }

    /// Consumes the outcome and returns the payload regardless of the variant.
    pub fn into_payload(self) -> T {
        match self {
            Self::Success(payload) | Self::Failure(payload) => payload,
        }
    }

    /// Converts the outcome into a [`Result`], mapping [`Outcome::Failure`] to `Err`.
    ///
    /// # Errors
    ///
    /// Returns the payload as the error if the outcome is a failure.
    pub fn into_result(self) -> Result<T, T> {
        match self {
            Self::Success(payload) => Ok(payload),
            Self::Failure(payload) => Err(payload),
        }
    }
}

/// A synchronous unit of work that a circuit breaker can protect.
///
/// `execute` consumes the operation, so each call runs it at most once. Closures of the form
/// `FnOnce() -> Result<Outcome<T>, OperationError>` implement this trait.
///
/// # Examples
///
/// ```
/// use fusebox::{Operation, OperationError, Outcome};
///
/// struct Ping {
///     reachable: bool,
/// }
///
/// impl Operation for Ping {
///     type Output = &'static str;
///
///     fn execute(self) -> Result<Outcome<Self::Output>, OperationError> {
///         if self.reachable {
///             Ok(Outcome::success("pong"))
///         } else {
///             Err(OperationError::from_message("host unreachable"))
///         }
///     }
/// }
///
/// assert!(Ping { reachable: true }.execute().is_ok());
/// ```
pub trait Operation {
    /// The payload produced by the operation.
    type Output;

    /// Runs the operation.
    ///
    /// # Errors
    ///
    /// Returns an [`OperationError`] when the operation fails in a way that should count
    /// against the circuit.
    fn execute(self) -> Result<Outcome<Self::Output>, OperationError>;
}

impl<F, T> Operation for F
where
    F: FnOnce() -> Result<Outcome<T>, OperationError>,
{
    type Output = T;

    fn execute(self) -> Result<Outcome<T>, OperationError> {
        self()
    }
}

/// An asynchronous unit of work that a circuit breaker can protect.
///
/// The asynchronous counterpart of [`Operation`]. Closures returning a `Send` future of
/// `Result<Outcome<T>, OperationError>` implement this trait.
pub trait AsyncOperation {
    /// The payload produced by the operation.
    type Output;

    /// Runs the operation.
    fn execute(self) -> impl Future<Output = Result<Outcome<Self::Output>, OperationError>> + Send;
}

impl<F, Fut, T> AsyncOperation for F
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Outcome<T>, OperationError>> + Send,
{
    type Output = T;

    fn execute(self) -> impl Future<Output = Result<Outcome<T>, OperationError>> + Send {
        self()
    }
}
