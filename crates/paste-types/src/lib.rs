//! Foundation types for the pastebin service.
//!
//! Every other pastebin crate depends on `paste-types`.
//!
//! # Key Types
//!
//! - [`PasteName`]: validated, user-chosen identifier of a paste
//! - [`Credential`]: short random secret handed out once at creation
//! - [`SecretHash`]: one-way hash of a credential; the join key between the
//!   record store and the blob store
//! - [`PasteRecord`]: the `(name, secret_hash)` pair owned by the record store

pub mod credential;
pub mod error;
pub mod name;
pub mod record;

pub use credential::Credential;
pub use error::TypeError;
pub use name::PasteName;
pub use record::{PasteRecord, SecretHash};
