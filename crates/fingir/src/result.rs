//! Result and error types for Fingir.

use thiserror::Error;

/// Result type for Fingir operations
pub type FingirResult<T> = Result<T, FingirError>;

/// Errors that can occur in Fingir
#[derive(Debug, Error)]
pub enum FingirError {
    /// A bounded poll never observed the expected condition
    #[error("Timed out after {ms}ms waiting for {waiting_for}{}", last_observed.as_ref().map(|v| format!(" (last observed: {v})")).unwrap_or_default())]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Human-readable description of the awaited condition
        waiting_for: String,
        /// Last value the poll observed before giving up, where feasible
        last_observed: Option<String>,
    },

    /// An expectation about state did not hold
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Operation called in a state that does not permit it
    /// (e.g. a second controller call while one is outstanding)
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Error message
        message: String,
    },

    /// Fixture setup or teardown failed
    #[error("Fixture error: {message}")]
    FixtureError {
        /// Error message
        message: String,
    },

    /// A controller-channel payload could not survive a clone round-trip
    #[error("Message not cloneable: {message}")]
    NotCloneable {
        /// Error message
        message: String,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FingirError {
    /// Create a timeout error without a last-observed value
    #[must_use]
    pub fn timeout(ms: u64, waiting_for: impl Into<String>) -> Self {
        Self::Timeout {
            ms,
            waiting_for: waiting_for.into(),
            last_observed: None,
        }
    }

    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }
}
