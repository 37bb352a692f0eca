//! Create and read orchestration for the pastebin service.
//!
//! [`PasteService`] is the only component that sees all three backends at
//! once and therefore owns the cross-component invariants:
//!
//! - a blob exists iff its record exists and was not rolled back;
//! - the plaintext credential is returned once and never stored;
//! - the cache only ever changes latency, never the outcome of a read.
//!
//! Backends are injected as trait objects ([`Backends`]) so tests can
//! substitute in-memory or fault-injecting implementations.

pub mod config;
pub mod error;
pub mod service;

#[cfg(test)]
mod testing;

pub use config::ServiceConfig;
pub use error::{PasteError, PasteResult};
pub use service::{Backends, PasteService};
