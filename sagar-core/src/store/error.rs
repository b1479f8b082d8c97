//! Error types for sagar stores.

use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// A conditional update found a different current value.
    #[error("conflict on {id}: expected {expected}, found {actual}")]
    Conflict {
        id: String,
        expected: String,
        actual: String,
    },

    /// The requested status change is not allowed.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// The record already exists.
    #[error("duplicate record: {0}")]
    Duplicate(String),

    /// The backing store could not complete the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
