//! Short-lived cache in front of the record store.
//!
//! Entries map a paste name to its secret hash for a bounded TTL. The cache
//! is advisory: every consumer must treat a miss, an expired entry or a
//! cache error exactly like an empty cache and fall back to the record
//! store.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{CacheError, CacheResult};
pub use memory::{DisabledCache, TtlCache};
pub use traits::HashCache;

/// Default lifetime of a cached entry.
pub const DEFAULT_TTL: std::time::Duration = std::time::Duration::from_secs(30);
