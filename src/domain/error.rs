//! Error types for the homescout client engine.
//!
//! This module defines the centralized error type [`HomescoutError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! No variant is fatal to the process: every failure leaves prior state intact and
//! is either surfaced to the user or logged, depending on the operation.

use thiserror::Error;

/// The main error type for homescout operations.
///
/// Request failures (`Network`, `Api`, `Decode`) form the transient family that the
/// application layer recovers from or reports. `Validation` rejects malformed user
/// input at the boundary before it reaches any engine state.
///
/// # Examples
///
/// ```
/// use homescout::HomescoutError;
///
/// let err = HomescoutError::Validation("min_price: expected a number".to_string());
/// assert!(!err.is_request_failure());
/// ```
#[derive(Debug, Error)]
pub enum HomescoutError {
    /// The request never produced an HTTP response (connect, timeout, TLS).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    ///
    /// `message` carries the backend's `{"error": "..."}` body verbatim when present.
    #[error("API error (status {status}): {}", message.as_deref().unwrap_or("no error message"))]
    Api {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Error string from the response body, if any.
        message: Option<String>,
    },

    /// The backend answered successfully but the body did not match the contract.
    #[error("Decode error: {0}")]
    Decode(String),

    /// User input was rejected before entering engine state.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Reading from or writing to the durable settings cache failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations. Automatically converts
    /// from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HomescoutError {
    /// Returns `true` for failures of a backend request.
    #[must_use]
    pub const fn is_request_failure(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Api { .. } | Self::Decode(_))
    }

    /// Returns the backend's error string, if this error carries one.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// A specialized `Result` type for homescout operations.
pub type Result<T> = std::result::Result<T, HomescoutError>;
