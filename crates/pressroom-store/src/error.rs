//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An admin or user already exists with this email.
    #[error("email already taken: {0}")]
    EmailTaken(String),

    /// Invalid data in storage (unparseable role or status column).
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// The connection mutex was poisoned by a panicking writer.
    #[error("store mutex poisoned")]
    LockPoisoned,

    /// A blocking task failed to complete.
    #[error("background task failed: {0}")]
    Background(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
