//! Tenant-scoped user provisioning.

use tracing::instrument;

use tenantgate_core::{NewUser, TenantId, UserProfile, validate_user_input};

use super::{IdentityError, IdentityService};

/// Input for a regular user.
///
/// No role or tenant: both are fixed by the flow.
#[derive(Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CreateUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl IdentityService {
    /// Create a `USER` in `tenant_id`, which must come from the resolved
    /// request context.
    #[instrument(skip_all, fields(%tenant_id))]
    pub async fn create_user(&self, input: CreateUser, tenant_id: TenantId) -> Result<UserProfile, IdentityError> {
        validate_user_input(&input.name, &input.email, &input.password)?;
        let password_hash = self.hash_password(&input.password).await?;

        let mut tx = self.store.begin().await?;

        if tx.find_tenant_by_id(tenant_id).await?.is_none() {
            Self::abandon(tx).await;
            tracing::warn!("user creation for unknown tenant");
            return Err(IdentityError::TenantNotFound);
        }

        if tx.find_user_by_email(input.email.trim()).await?.is_some() {
            Self::abandon(tx).await;
            tracing::warn!("user email already registered");
            return Err(IdentityError::UserAlreadyExists);
        }

        let user = tx
            .create_user(NewUser::member(tenant_id, input.name, input.email, password_hash)?)
            .await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, "user provisioned");
        Ok(user.profile())
    }

    pub async fn list_users(&self, tenant_id: TenantId) -> Result<Vec<UserProfile>, IdentityError> {
        let users = self.store.list_users_by_tenant(tenant_id).await?;
        Ok(users.iter().map(|u| u.profile()).collect())
    }
}
