/// Errors from credential hashing and verification.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CryptoError {
    /// The configured cost parameters are out of range.
    #[error("invalid hash parameters: {0}")]
    InvalidParams(String),

    /// Hashing the credential failed.
    #[error("hashing failed: {0}")]
    Hashing(String),

    /// A stored hash could not be parsed as a PHC string.
    #[error("malformed secret hash: {0}")]
    MalformedHash(String),
}

pub type CryptoResult<T> = Result<T, CryptoError>;
