use thiserror::Error;

use paste_blob::BlobError;
use paste_crypto::CryptoError;
use paste_store::RecordError;
use paste_types::TypeError;

/// Outcome taxonomy of create and read.
///
/// `InvalidName`, `Conflict`, `NotFound` and `AuthFailure` are client
/// errors; everything else is a backend failure.
#[derive(Debug, Error)]
pub enum PasteError {
    #[error("invalid paste name: {0}")]
    InvalidName(#[from] TypeError),

    #[error("this name already exists: {name}")]
    Conflict { name: String },

    #[error("text with provided name does not exist: {name}")]
    NotFound { name: String },

    #[error("wrong credentials")]
    AuthFailure,

    #[error("record store error: {0}")]
    Records(#[from] RecordError),

    #[error("blob store error: {0}")]
    Blobs(#[from] BlobError),

    #[error("hashing error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("{op} timed out")]
    Timeout { op: &'static str },

    #[error("internal error: {0}")]
    Internal(String),
}

impl PasteError {
    /// `true` for errors caused by the request rather than a backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidName(_) | Self::Conflict { .. } | Self::NotFound { .. } | Self::AuthFailure
        )
    }
}

pub type PasteResult<T> = Result<T, PasteError>;
