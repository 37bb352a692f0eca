use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::name::PasteName;

/// One-way, salted hash of a [`Credential`], in PHC string form.
///
/// This is the only form in which a credential is persisted, and it is the
/// sole join key between the record store and the blob store.
///
/// [`Credential`]: crate::Credential
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretHash(String);

impl SecretHash {
    pub fn new(hash: impl Into<String>) -> Result<Self, TypeError> {
        let hash = hash.into();
        if hash.is_empty() {
            return Err(TypeError::EmptyHash);
        }
        Ok(Self(hash))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem- and URL-safe key derived from the hash string.
    ///
    /// PHC strings contain `$`, `/` and `+`, so backends that address
    /// content by path use this BLAKE3 hex digest instead.
    pub fn storage_key(&self) -> String {
        blake3::hash(self.0.as_bytes()).to_hex().to_string()
    }

    /// Short fingerprint for log lines (first 8 hex chars of the storage key).
    pub fn fingerprint(&self) -> String {
        self.storage_key()[..8].to_string()
    }
}

impl fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretHash({})", self.fingerprint())
    }
}

impl fmt::Display for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted paste: its name and the hash of the credential that unlocks it.
///
/// Created on submission, never updated. Deleted only by the compensating
/// rollback that follows a failed blob write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteRecord {
    pub name: PasteName,
    pub secret_hash: SecretHash,
}

impl PasteRecord {
    pub fn new(name: PasteName, secret_hash: SecretHash) -> Self {
        Self { name, secret_hash }
    }
}
