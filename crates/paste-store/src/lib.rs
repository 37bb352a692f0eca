//! Record store for the pastebin service.
//!
//! A record maps a unique, user-chosen paste name to the secret hash of the
//! credential that unlocks it. Records are written once and never updated;
//! the only delete path is the compensating rollback after a failed blob
//! write.
//!
//! # Modules
//!
//! - [`error`]: Error types for record operations
//! - [`traits`]: The [`RecordStore`] trait defining the storage interface
//! - [`memory`]: In-memory [`InMemoryRecordStore`] for tests and ephemeral use
//! - [`sqlite`]: [`SqliteRecordStore`] backed by an `sqlx` connection pool

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod traits;

pub use error::{RecordError, RecordResult};
pub use memory::InMemoryRecordStore;
pub use sqlite::SqliteRecordStore;
pub use traits::RecordStore;
