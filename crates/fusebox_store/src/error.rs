// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for circuit store operations.

/// An error from a circuit store operation.
///
/// This is an opaque error type that can wrap any underlying error from a store
/// implementation. Use [`std::error::Error::source()`] to access the underlying
/// cause if needed.
///
/// A store error means the circuit's source of truth is unavailable. Circuit breakers
/// propagate it to the caller as-is and never attempt to recover from it.
///
/// # Example
///
/// ```
/// use fusebox_store::Error;
///
/// let error = Error::from_message("connection to the state backend was reset");
/// ```
#[ohno::error]
pub struct Error {}

impl Error {
    /// Creates a new error from any type that can be converted to an error.
    ///
    /// This is the public API for creating store errors from external crates.
    ///
    /// # Examples
    ///
    /// ```
    /// use fusebox_store::Error;
    ///
    /// let error = Error::from_message("operation failed");
    /// let io = Error::from_message(std::io::Error::other("disk unavailable"));
    /// ```
    pub fn from_message(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(cause)
    }
}

/// A specialized [`Result`] type for circuit store operations.
pub type Result<T> = std::result::Result<T, Error>;
