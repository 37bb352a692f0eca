//! Fault-injecting backends for orchestrator tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use paste_blob::{BlobError, BlobResult, BlobStore};
use paste_cache::{CacheError, CacheResult, HashCache};
use paste_crypto::{Argon2Hasher, HashParams, SecretHasher};
use paste_store::{InMemoryRecordStore, RecordError, RecordResult, RecordStore};
use paste_types::{PasteName, PasteRecord, SecretHash};

use crate::config::ServiceConfig;
use crate::service::{Backends, PasteService};

pub fn fast_hasher() -> Arc<dyn SecretHasher> {
    Arc::new(Argon2Hasher::new(HashParams::insecure_fast()).unwrap())
}

pub fn service(backends: Backends) -> PasteService {
    PasteService::new(backends, fast_hasher(), ServiceConfig::default())
}

/// Every write fails as if the disk were full.
pub struct FailingBlobStore;

#[async_trait]
impl BlobStore for FailingBlobStore {
    async fn put(&self, _hash: &SecretHash, _text: &str) -> BlobResult<()> {
        Err(BlobError::Io(std::io::Error::other("disk full")))
    }

    async fn get(&self, hash: &SecretHash) -> BlobResult<String> {
        Err(BlobError::NotFound {
            key: hash.fingerprint(),
        })
    }
}

/// Every call hangs until the caller gives up.
pub struct StalledBlobStore;

#[async_trait]
impl BlobStore for StalledBlobStore {
    async fn put(&self, _hash: &SecretHash, _text: &str) -> BlobResult<()> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }

    async fn get(&self, _hash: &SecretHash) -> BlobResult<String> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(String::new())
    }
}

/// Every call errors, as if the cache server were down.
pub struct FailingCache;

#[async_trait]
impl HashCache for FailingCache {
    async fn get(&self, _name: &PasteName) -> CacheResult<Option<SecretHash>> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn set(&self, _name: &PasteName, _hash: &SecretHash, _ttl: Duration) -> CacheResult<()> {
        Err(CacheError::Unavailable("connection refused".into()))
    }
}

fn db_down() -> RecordError {
    RecordError::Io(std::io::Error::other("database unreachable"))
}

/// Every call errors.
pub struct BrokenRecordStore;

#[async_trait]
impl RecordStore for BrokenRecordStore {
    async fn put(&self, _record: &PasteRecord) -> RecordResult<()> {
        Err(db_down())
    }

    async fn get(&self, _name: &PasteName) -> RecordResult<Option<SecretHash>> {
        Err(db_down())
    }

    async fn delete(&self, _name: &PasteName) -> RecordResult<bool> {
        Err(db_down())
    }

    async fn delete_if(&self, _name: &PasteName, _hash: &SecretHash) -> RecordResult<bool> {
        Err(db_down())
    }
}

/// Works normally except that deletes always fail.
#[derive(Default)]
pub struct UndeletableRecordStore {
    inner: InMemoryRecordStore,
}

#[async_trait]
impl RecordStore for UndeletableRecordStore {
    async fn put(&self, record: &PasteRecord) -> RecordResult<()> {
        self.inner.put(record).await
    }

    async fn get(&self, name: &PasteName) -> RecordResult<Option<SecretHash>> {
        self.inner.get(name).await
    }

    async fn delete(&self, _name: &PasteName) -> RecordResult<bool> {
        Err(db_down())
    }

    async fn delete_if(&self, _name: &PasteName, _hash: &SecretHash) -> RecordResult<bool> {
        Err(db_down())
    }
}

/// Commits every insert, then hangs before acknowledging it.
#[derive(Default)]
pub struct StallAfterInsertRecordStore {
    inner: InMemoryRecordStore,
}

#[async_trait]
impl RecordStore for StallAfterInsertRecordStore {
    async fn put(&self, record: &PasteRecord) -> RecordResult<()> {
        self.inner.put(record).await?;
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }

    async fn get(&self, name: &PasteName) -> RecordResult<Option<SecretHash>> {
        self.inner.get(name).await
    }

    async fn delete(&self, name: &PasteName) -> RecordResult<bool> {
        self.inner.delete(name).await
    }

    async fn delete_if(&self, name: &PasteName, hash: &SecretHash) -> RecordResult<bool> {
        self.inner.delete_if(name, hash).await
    }
}

/// In-memory store that counts `get` calls.
#[derive(Default)]
pub struct CountingRecordStore {
    inner: InMemoryRecordStore,
    gets: AtomicUsize,
}

impl CountingRecordStore {
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for CountingRecordStore {
    async fn put(&self, record: &PasteRecord) -> RecordResult<()> {
        self.inner.put(record).await
    }

    async fn get(&self, name: &PasteName) -> RecordResult<Option<SecretHash>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(name).await
    }

    async fn exists(&self, name: &PasteName) -> RecordResult<bool> {
        self.inner.exists(name).await
    }

    async fn delete(&self, name: &PasteName) -> RecordResult<bool> {
        self.inner.delete(name).await
    }

    async fn delete_if(&self, name: &PasteName, hash: &SecretHash) -> RecordResult<bool> {
        self.inner.delete_if(name, hash).await
    }
}
