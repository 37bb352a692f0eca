//! Error types for record operations.

use thiserror::Error;

/// Errors that can occur during record store operations.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A record with this name already exists (uniqueness constraint).
    #[error("record already exists: {name}")]
    AlreadyExists { name: String },

    /// A stored row could not be turned back into a record.
    #[error("corrupt record {name}: {reason}")]
    Corrupt { name: String, reason: String },

    /// Database driver or connection failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An in-process lock was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// I/O error while preparing the database location.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for record operations.
pub type RecordResult<T> = std::result::Result<T, RecordError>;
