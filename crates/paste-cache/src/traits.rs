use std::time::Duration;

use async_trait::async_trait;
use paste_types::{PasteName, SecretHash};

use crate::error::CacheResult;

/// Expiring `name → secret_hash` map.
///
/// Writers for the same name are last-writer-wins; all writers within a
/// TTL window derive the same hash from the record store.
#[async_trait]
pub trait HashCache: Send + Sync {
    /// Return the cached hash for `name`, or `None` if absent or expired.
    async fn get(&self, name: &PasteName) -> CacheResult<Option<SecretHash>>;

    /// Cache `hash` for `name` for `ttl`.
    async fn set(&self, name: &PasteName, hash: &SecretHash, ttl: Duration) -> CacheResult<()>;
}
