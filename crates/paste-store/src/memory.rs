//! In-memory record store for testing and ephemeral use.
//!
//! [`InMemoryRecordStore`] keeps all records in a `HashMap` protected by a
//! `RwLock`. Data is lost when the store is dropped.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use paste_types::{PasteName, PasteRecord, SecretHash};

use crate::error::{RecordError, RecordResult};
use crate::traits::RecordStore;

/// An in-memory implementation of [`RecordStore`].
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<PasteName, SecretHash>>,
}

impl InMemoryRecordStore {
    /// Create a new empty record store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn put(&self, record: &PasteRecord) -> RecordResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| RecordError::LockPoisoned(e.to_string()))?;
        match records.entry(record.name.clone()) {
            Entry::Occupied(_) => Err(RecordError::AlreadyExists {
                name: record.name.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(record.secret_hash.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, name: &PasteName) -> RecordResult<Option<SecretHash>> {
        let records = self
            .records
            .read()
            .map_err(|e| RecordError::LockPoisoned(e.to_string()))?;
        Ok(records.get(name).cloned())
    }

    async fn delete(&self, name: &PasteName) -> RecordResult<bool> {
        let mut records = self
            .records
            .write()
            .map_err(|e| RecordError::LockPoisoned(e.to_string()))?;
        Ok(records.remove(name).is_some())
    }

    async fn delete_if(&self, name: &PasteName, hash: &SecretHash) -> RecordResult<bool> {
        let mut records = self
            .records
            .write()
            .map_err(|e| RecordError::LockPoisoned(e.to_string()))?;
        match records.entry(name.clone()) {
            Entry::Occupied(slot) if slot.get() == hash => {
                slot.remove();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
