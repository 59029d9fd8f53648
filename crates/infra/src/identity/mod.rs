//! Identity flows: tenant resolution, login and provisioning.
//!
//! Every flow runs against a [`CredentialStore`]; anything that checks a
//! uniqueness rule and then writes does so inside one store transaction.

use std::sync::Arc;

use tenantgate_auth::{PasswordHasher, TokenIssuer};

use crate::store::{CredentialStore, CredentialTransaction};

pub mod authentication;
pub mod error;
pub mod gate;
pub mod tenants;
pub mod users;

pub use authentication::{INVALID_CREDENTIALS_MESSAGE, LoginSuccess};
pub use error::IdentityError;
pub use gate::require_tenant_identifier;
pub use tenants::{CreateTenant, PurgeSummary};
pub use users::CreateUser;

/// Identity boundary wiring: store + hasher + token issuer.
///
/// Cheap to clone; all parts are shared and read-only.
#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenIssuer>,
}

impl IdentityService {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            tokens: Arc::new(tokens),
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Argon2 is CPU-bound; keep it off the async workers.
    async fn hash_password(&self, plaintext: &str) -> Result<String, IdentityError> {
        let hasher = self.hasher.clone();
        let plaintext = plaintext.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| IdentityError::Internal(format!("hashing task failed: {e}")))?
            .map_err(IdentityError::from)
    }

    /// Roll back after a rejected check. A failed rollback is only logged so
    /// the caller's error is the one reported.
    async fn abandon(tx: Box<dyn CredentialTransaction>) {
        if let Err(e) = tx.rollback().await {
            tracing::warn!(error = %e, "rollback failed; transaction dropped");
        }
    }

    async fn verify_password(&self, plaintext: &str, hashed: Option<&str>) -> Result<bool, IdentityError> {
        let hasher = self.hasher.clone();
        let plaintext = plaintext.to_owned();
        let hashed = hashed.map(str::to_owned);
        tokio::task::spawn_blocking(move || match hashed {
            Some(hashed) => hasher.verify(&plaintext, &hashed),
            None => {
                hasher.verify_decoy(&plaintext);
                false
            }
        })
        .await
        .map_err(|e| IdentityError::Internal(format!("verification task failed: {e}")))
    }
}
