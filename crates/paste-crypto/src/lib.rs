//! Cryptographic primitives for the pastebin service.
//!
//! Issues short random credentials and turns them into salted, one-way
//! secret hashes that can later be verified. Hashing is Argon2id in PHC
//! string form; verification goes through the `argon2` crate's
//! constant-time comparison.
//!
//! All crypto operations wrap established libraries; no custom cryptography.

pub mod credential;
pub mod error;
pub mod hasher;

pub use credential::generate_credential;
pub use error::{CryptoError, CryptoResult};
pub use hasher::{Argon2Hasher, HashParams, SecretHasher};
