//! The [`RecordStore`] trait defining the record storage interface.

use async_trait::async_trait;
use paste_types::{PasteName, PasteRecord, SecretHash};

use crate::error::RecordResult;

/// Durable store of `name → secret_hash` records.
///
/// Implementations must be thread-safe (`Send + Sync`) and enforce
/// uniqueness of names atomically: when two writers race on the same name,
/// exactly one `put` succeeds and the other returns
/// [`RecordError::AlreadyExists`](crate::RecordError::AlreadyExists).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new record. Fails with `AlreadyExists` if the name is taken.
    async fn put(&self, record: &PasteRecord) -> RecordResult<()>;

    /// Look up the secret hash stored for `name`.
    ///
    /// Returns `Ok(None)` if no record exists.
    async fn get(&self, name: &PasteName) -> RecordResult<Option<SecretHash>>;

    /// Check whether a record exists for `name`.
    async fn exists(&self, name: &PasteName) -> RecordResult<bool> {
        Ok(self.get(name).await?.is_some())
    }

    /// Delete the record for `name`.
    ///
    /// Returns `Ok(true)` if the record existed and was deleted.
    async fn delete(&self, name: &PasteName) -> RecordResult<bool>;

    /// Delete the record for `name` only if it still holds `hash`.
    ///
    /// A record written by someone else under the same name is left
    /// alone. Returns `Ok(true)` if a record was deleted.
    async fn delete_if(&self, name: &PasteName, hash: &SecretHash) -> RecordResult<bool>;

    /// Check backend connectivity.
    async fn health_check(&self) -> RecordResult<()> {
        Ok(())
    }
}
