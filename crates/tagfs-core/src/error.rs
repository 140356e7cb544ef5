//! Error types for tagfs.

use thiserror::Error;

/// Result type alias using tagfs's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for tagfs operations.
///
/// Every validation failure carries a human-readable message identifying the
/// offending id or value; callers surface the message verbatim. A failure
/// aborts the current operation and leaves all state as it was before the
/// call.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Tag not found
    #[error("Tag id '{0}' does not exist")]
    TagNotFound(i64),

    /// File not found
    #[error("File id '{0}' does not exist")]
    FileNotFound(i64),

    /// Invalid input (malformed color, empty edit request)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Conflict (duplicate path, self-parent or cycle on edge mutation)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
