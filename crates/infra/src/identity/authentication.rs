//! Credential verification and session token issuance.

use tracing::instrument;

use tenantgate_auth::SessionClaims;
use tenantgate_core::UserId;

use super::{IdentityError, IdentityService};

/// Message shared by every rejected login, whatever the cause.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSuccess {
    pub user_id: UserId,
    pub access_token: String,
}

impl IdentityService {
    /// Authenticate by email + password.
    ///
    /// Unknown email and wrong password both return
    /// `IdentityError::InvalidCredentials` after the same amount of hashing
    /// work. Store faults are reported as such.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSuccess, IdentityError> {
        let user = self.store.find_user_by_email(email.trim()).await?;

        let verified = self
            .verify_password(password, user.as_ref().map(|u| u.password_hash.as_str()))
            .await?;

        let user = match user {
            Some(user) if verified => user,
            _ => {
                tracing::info!("login rejected");
                return Err(IdentityError::InvalidCredentials);
            }
        };

        let access_token = self.tokens.issue(&SessionClaims::for_user(&user))?;
        tracing::info!(user_id = %user.id, tenant_id = %user.tenant_id, "login succeeded");

        Ok(LoginSuccess {
            user_id: user.id,
            access_token,
        })
    }
}
