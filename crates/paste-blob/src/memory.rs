use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use paste_types::SecretHash;

use crate::error::{BlobError, BlobResult};
use crate::traits::BlobStore;

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. Blobs are cloned on read/write.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<SecretHash, String>>,
}

impl InMemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, hash: &SecretHash, text: &str) -> BlobResult<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|e| BlobError::LockPoisoned(e.to_string()))?;
        match blobs.entry(hash.clone()) {
            Entry::Occupied(_) => Err(BlobError::AlreadyExists {
                key: hash.fingerprint(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(text.to_string());
                Ok(())
            }
        }
    }

    async fn get(&self, hash: &SecretHash) -> BlobResult<String> {
        let blobs = self
            .blobs
            .read()
            .map_err(|e| BlobError::LockPoisoned(e.to_string()))?;
        blobs.get(hash).cloned().ok_or_else(|| BlobError::NotFound {
            key: hash.fingerprint(),
        })
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len())
            .finish()
    }
}
