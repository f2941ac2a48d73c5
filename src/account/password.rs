//! Password hashing
//!
//! Argon2id with a fresh random salt per hash. Hashes are PHC strings, so the
//! salt and cost parameters travel with the stored value.

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

use crate::error::AccountError;

/// Hashes and verifies passwords with a fixed set of Argon2 cost parameters.
#[derive(Clone, Debug)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    /// Build a hasher with explicit cost parameters (memory in KiB).
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AccountError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AccountError::Hashing(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, password: &str) -> Result<String, AccountError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AccountError::Hashing(e.to_string()))
    }

    /// Returns `Ok(false)` on mismatch. An unparseable stored hash is an error.
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, AccountError> {
        let parsed =
            PasswordHash::new(stored_hash).map_err(|e| AccountError::Hashing(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AccountError::Hashing(e.to_string())),
        }
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}
