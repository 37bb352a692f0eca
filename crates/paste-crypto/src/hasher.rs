use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};

use paste_types::{Credential, SecretHash};

use crate::error::{CryptoError, CryptoResult};

/// One-way transform of credentials into storable secret hashes.
///
/// Implementations must be salted (two hashes of the same credential
/// differ) and must verify through a constant-time comparison.
pub trait SecretHasher: Send + Sync {
    /// Hash a freshly issued credential.
    fn hash(&self, credential: &Credential) -> CryptoResult<SecretHash>;

    /// Check a presented credential against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch. Returns `Err` only when the stored
    /// hash itself is unusable.
    fn verify(&self, credential: &Credential, hash: &SecretHash) -> CryptoResult<bool>;
}

/// Argon2id cost parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashParams {
    /// The cheapest parameters Argon2 accepts. For tests only.
    pub fn insecure_fast() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }

    fn to_argon2_params(self) -> CryptoResult<Params> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| CryptoError::InvalidParams(e.to_string()))
    }
}

/// Argon2id [`SecretHasher`].
///
/// Hashes are produced with the configured parameters; verification uses
/// the parameters embedded in the stored PHC string, so hashes written
/// under older settings keep verifying after a cost change.
#[derive(Clone, Debug)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new(params: HashParams) -> CryptoResult<Self> {
        Ok(Self {
            params: params.to_argon2_params()?,
        })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl SecretHasher for Argon2Hasher {
    fn hash(&self, credential: &Credential) -> CryptoResult<SecretHash> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = self
            .argon2()
            .hash_password(credential.as_bytes(), &salt)
            .map_err(|e| CryptoError::Hashing(e.to_string()))?
            .to_string();
        SecretHash::new(phc).map_err(|e| CryptoError::Hashing(e.to_string()))
    }

    fn verify(&self, credential: &Credential, hash: &SecretHash) -> CryptoResult<bool> {
        let parsed = PasswordHash::new(hash.as_str())
            .map_err(|e| CryptoError::MalformedHash(e.to_string()))?;
        match self.argon2().verify_password(credential.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CryptoError::MalformedHash(e.to_string())),
        }
    }
}
