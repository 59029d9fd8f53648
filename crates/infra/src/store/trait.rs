use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use tenantgate_core::{NewTenant, NewUser, Tenant, TenantId, User};

/// Unique constraints the store enforces as the last line of defence.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UniqueKey {
    TenantEmail,
    UserEmail,
}

impl core::fmt::Display for UniqueKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UniqueKey::TenantEmail => f.write_str("tenant email"),
            UniqueKey::UserEmail => f.write_str("user email"),
        }
    }
}

/// Credential store operation error.
///
/// Constraint violations are reported precisely so callers can turn them
/// into domain conflicts. Everything else is an infrastructure fault.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(UniqueKey),

    #[error("foreign key violated: {0}")]
    ForeignKeyViolation(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Durable storage for tenants and users.
///
/// Plain reads go through the store; anything that checks and then writes
/// goes through [`CredentialStore::begin`].
///
/// ## Implementation Requirements
///
/// - `users.email` and `tenants.email` are unique; violations return
///   `StoreError::UniqueViolation` and abort only the offending statement.
/// - A user row requires an existing tenant row.
/// - Work done in a transaction is invisible to others until `commit` and is
///   discarded by `rollback` or by dropping the transaction.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_tenant_by_id(&self, id: TenantId) -> Result<Option<Tenant>, StoreError>;

    async fn find_tenant_by_email(&self, email: &str) -> Result<Option<Tenant>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Users of one tenant, oldest first.
    async fn list_users_by_tenant(&self, tenant_id: TenantId) -> Result<Vec<User>, StoreError>;

    async fn begin(&self) -> Result<Box<dyn CredentialTransaction>, StoreError>;
}

/// A unit of work against the credential store.
#[async_trait]
pub trait CredentialTransaction: Send {
    async fn find_tenant_by_id(&mut self, id: TenantId) -> Result<Option<Tenant>, StoreError>;

    async fn find_tenant_by_email(&mut self, email: &str) -> Result<Option<Tenant>, StoreError>;

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, StoreError>;

    async fn create_tenant(&mut self, tenant: NewTenant) -> Result<Tenant, StoreError>;

    async fn create_user(&mut self, user: NewUser) -> Result<User, StoreError>;

    /// Returns the number of rows removed.
    async fn delete_all_users(&mut self) -> Result<u64, StoreError>;

    /// Returns the number of rows removed. Fails while any user still exists.
    async fn delete_all_tenants(&mut self) -> Result<u64, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    async fn find_tenant_by_id(&self, id: TenantId) -> Result<Option<Tenant>, StoreError> {
        (**self).find_tenant_by_id(id).await
    }

    async fn find_tenant_by_email(&self, email: &str) -> Result<Option<Tenant>, StoreError> {
        (**self).find_tenant_by_email(email).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        (**self).find_user_by_email(email).await
    }

    async fn list_users_by_tenant(&self, tenant_id: TenantId) -> Result<Vec<User>, StoreError> {
        (**self).list_users_by_tenant(tenant_id).await
    }

    async fn begin(&self) -> Result<Box<dyn CredentialTransaction>, StoreError> {
        (**self).begin().await
    }
}
