use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use paste_types::{PasteName, SecretHash};
use tokio::time::Instant;

use crate::error::{CacheError, CacheResult};
use crate::traits::HashCache;

#[derive(Clone, Debug)]
struct CachedEntry {
    hash: SecretHash,
    expires_at: Instant,
}

impl CachedEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// In-process TTL cache.
///
/// Expired entries are invisible to `get` and are pruned lazily: on the
/// read that finds them, and in bulk when an insert hits `max_entries`.
/// If the map is still full after pruning, the entry closest to expiry is
/// evicted.
#[derive(Debug)]
pub struct TtlCache {
    entries: RwLock<HashMap<PasteName, CachedEntry>>,
    max_entries: usize,
}

impl TtlCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Number of entries held, including ones that have expired but not
    /// yet been pruned.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) -> CacheResult<()> {
        self.entries
            .write()
            .map_err(|e| CacheError::LockPoisoned(e.to_string()))?
            .clear();
        Ok(())
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl HashCache for TtlCache {
    async fn get(&self, name: &PasteName) -> CacheResult<Option<SecretHash>> {
        let now = Instant::now();
        {
            let entries = self
                .entries
                .read()
                .map_err(|e| CacheError::LockPoisoned(e.to_string()))?;
            match entries.get(name) {
                None => return Ok(None),
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.hash.clone())),
                Some(_) => {}
            }
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::LockPoisoned(e.to_string()))?;
        // Re-check: another task may have refreshed the entry in between.
        if entries.get(name).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(name);
        }
        Ok(None)
    }

    async fn set(&self, name: &PasteName, hash: &SecretHash, ttl: Duration) -> CacheResult<()> {
        let now = Instant::now();
        let Some(expires_at) = now.checked_add(ttl) else {
            tracing::debug!(name = %name, ?ttl, "ttl out of range, not caching");
            return Ok(());
        };
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::LockPoisoned(e.to_string()))?;

        if !entries.contains_key(name) && entries.len() >= self.max_entries {
            entries.retain(|_, entry| entry.is_live(now));
            if entries.len() >= self.max_entries {
                let victim = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.expires_at)
                    .map(|(k, _)| k.clone());
                if let Some(victim) = victim {
                    tracing::debug!(evicted = %victim, "cache full, evicting");
                    entries.remove(&victim);
                }
            }
        }

        entries.insert(
            name.clone(),
            CachedEntry {
                hash: hash.clone(),
                expires_at,
            },
        );
        Ok(())
    }
}

/// A cache that never holds anything.
///
/// Every `get` misses and every `set` is a no-op. Reads behave exactly as
/// with a live cache, only slower.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledCache;

#[async_trait]
impl HashCache for DisabledCache {
    async fn get(&self, _name: &PasteName) -> CacheResult<Option<SecretHash>> {
        Ok(None)
    }

    async fn set(&self, _name: &PasteName, _hash: &SecretHash, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }
}
