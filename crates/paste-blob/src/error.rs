/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// No blob is stored under this key.
    #[error("blob not found: {key}")]
    NotFound { key: String },

    /// A blob is already stored under this key.
    #[error("blob already exists: {key}")]
    AlreadyExists { key: String },

    /// Stored bytes are not valid paste text.
    #[error("corrupt blob {key}: {reason}")]
    Corrupt { key: String, reason: String },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An in-process lock was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// The caller went away before the write finished; nothing was kept.
    #[error("blob write abandoned: {key}")]
    Abandoned { key: String },

    /// A blocking storage task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(String),
}

/// Result alias for blob operations.
pub type BlobResult<T> = Result<T, BlobError>;
