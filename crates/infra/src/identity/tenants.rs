//! Tenant provisioning and the bulk reset.

use tracing::instrument;

use tenantgate_core::{NewTenant, NewUser, UserProfile, validate_user_input};

use super::{IdentityError, IdentityService};

/// Input for provisioning a tenant together with its founding admin.
#[derive(Clone)]
pub struct CreateTenant {
    pub name: String,
    pub email: String,
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl core::fmt::Debug for CreateTenant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CreateTenant")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("admin_name", &self.admin_name)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &"<redacted>")
            .finish()
    }
}

/// Rows removed by [`IdentityService::purge_all`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PurgeSummary {
    pub users: u64,
    pub tenants: u64,
}

impl IdentityService {
    /// Create a tenant and its founding `ADMIN` user atomically.
    ///
    /// If the tenant email is taken nothing is written. If the admin cannot
    /// be created (e.g. the admin email belongs to another user) the tenant
    /// row is rolled back with it. The password is hashed before the
    /// transaction opens.
    #[instrument(skip_all, fields(tenant_id = tracing::field::Empty))]
    pub async fn create_tenant(&self, input: CreateTenant) -> Result<UserProfile, IdentityError> {
        let new_tenant = NewTenant::new(input.name, input.email)?;
        validate_user_input(&input.admin_name, &input.admin_email, &input.admin_password)?;
        let password_hash = self.hash_password(&input.admin_password).await?;

        let mut tx = self.store.begin().await?;

        if tx.find_tenant_by_email(new_tenant.email()).await?.is_some() {
            Self::abandon(tx).await;
            tracing::warn!("tenant email already registered");
            return Err(IdentityError::TenantAlreadyExists);
        }

        let tenant = tx.create_tenant(new_tenant).await?;
        tracing::Span::current().record("tenant_id", tracing::field::display(tenant.id));

        let admin = NewUser::founding_admin(tenant.id, input.admin_name, input.admin_email, password_hash)?;
        let admin = match tx.create_user(admin).await {
            Ok(admin) => admin,
            Err(e) => {
                Self::abandon(tx).await;
                tracing::warn!(error = %e, "founding admin rejected; tenant rolled back");
                return Err(e.into());
            }
        };

        tx.commit().await?;
        tracing::info!(user_id = %admin.id, "tenant provisioned");

        Ok(admin.profile())
    }

    pub async fn tenant_exists(&self, email: &str) -> Result<bool, IdentityError> {
        Ok(self.store.find_tenant_by_email(email.trim()).await?.is_some())
    }

    /// Remove every user, then every tenant, in one transaction.
    #[instrument(skip_all)]
    pub async fn purge_all(&self) -> Result<PurgeSummary, IdentityError> {
        let mut tx = self.store.begin().await?;
        let users = tx.delete_all_users().await?;
        let tenants = tx.delete_all_tenants().await?;
        tx.commit().await?;

        tracing::warn!(users, tenants, "all tenants purged");
        Ok(PurgeSummary { users, tenants })
    }
}
