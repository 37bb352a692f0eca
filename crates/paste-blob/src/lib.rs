//! Blob storage for the pastebin service.
//!
//! Paste text lives here, one blob per record, keyed by the record's
//! [`SecretHash`](paste_types::SecretHash). The store never interprets
//! content and never exposes a delete path: a blob is only absent if its
//! write never completed.
//!
//! # Storage Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsBlobStore`] -- one file per blob under a root directory, written
//!   through a staged temporary file and an atomic rename

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{BlobError, BlobResult};
pub use fs::FsBlobStore;
pub use memory::InMemoryBlobStore;
pub use traits::BlobStore;
