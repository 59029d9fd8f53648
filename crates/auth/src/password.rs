//! Password hashing with Argon2id.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Default Argon2id iteration count (OWASP 2024).
pub const DEFAULT_HASH_COST: u32 = 2;

/// Default Argon2id memory cost in KiB (OWASP 2024, ~19 MiB).
pub const DEFAULT_HASH_MEMORY_KIB: u32 = 19_456;

const DECOY_PASSWORD: &str = "tenantgate:decoy-credential";

/// Salted one-way password hasher.
///
/// Holds a decoy hash produced with the same parameters so that a login for
/// an unknown account can pay the same verification cost as a real one.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
    decoy_hash: String,
}

impl PasswordHasher {
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        Self::with_params(config.password_hash_memory_kib, config.password_hash_cost)
    }

    /// # Errors
    ///
    /// Returns `AuthError::InvalidConfig` if Argon2 rejects the parameters.
    pub fn with_params(memory_kib: u32, cost: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, cost, 1, None)
            .map_err(|e| AuthError::InvalidConfig(format!("argon2 parameters: {e}")))?;

        let mut hasher = Self {
            params,
            decoy_hash: String::new(),
        };
        hasher.decoy_hash = hasher.hash(DECOY_PASSWORD)?;
        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password into a PHC-formatted string with a fresh salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// `true` only if `plaintext` matches `hashed`.
    ///
    /// A malformed stored hash is reported as a mismatch.
    pub fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hashed) else {
            return false;
        };
        self.argon2()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// Burn one verification against the decoy hash.
    pub fn verify_decoy(&self, plaintext: &str) {
        std::hint::black_box(self.verify(plaintext, &self.decoy_hash));
    }
}
