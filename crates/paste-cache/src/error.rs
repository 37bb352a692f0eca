use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

pub type CacheResult<T> = Result<T, CacheError>;
