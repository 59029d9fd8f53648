//! Authentication configuration.

use crate::password::{DEFAULT_HASH_COST, DEFAULT_HASH_MEMORY_KIB};

/// Configuration for hashing and token issuance. Read once at startup.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for signing session tokens.
    pub jwt_secret: String,
    /// Session token lifetime in seconds. `None` issues tokens without `exp`.
    pub token_ttl_secs: Option<u64>,
    /// Argon2id iteration count (work factor).
    pub password_hash_cost: u32,
    /// Argon2id memory cost in KiB.
    pub password_hash_memory_kib: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: None,
            password_hash_cost: DEFAULT_HASH_COST,
            password_hash_memory_kib: DEFAULT_HASH_MEMORY_KIB,
        }
    }
}

impl core::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("password_hash_cost", &self.password_hash_cost)
            .field("password_hash_memory_kib", &self.password_hash_memory_kib)
            .finish()
    }
}
