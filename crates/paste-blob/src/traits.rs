use async_trait::async_trait;
use paste_types::SecretHash;

use crate::error::BlobResult;

/// Store of paste text addressed by secret hash.
///
/// All implementations must satisfy these invariants:
/// - A blob is written at most once per key; a second `put` for the same
///   key fails with `AlreadyExists` and leaves the first blob intact.
/// - A failed `put` leaves nothing readable behind.
/// - Text is returned byte-for-byte as written.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `text` under `hash`.
    async fn put(&self, hash: &SecretHash, text: &str) -> BlobResult<()>;

    /// Fetch the text stored under `hash`.
    ///
    /// Returns `Err(BlobError::NotFound)` if nothing is stored there.
    async fn get(&self, hash: &SecretHash) -> BlobResult<String>;
}
