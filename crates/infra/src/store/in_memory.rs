use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use tenantgate_core::{Entity, NewTenant, NewUser, Tenant, TenantId, User, UserId};

use super::r#trait::{CredentialStore, CredentialTransaction, StoreError, UniqueKey};

#[derive(Debug, Clone, Default)]
struct Tables {
    tenants: HashMap<TenantId, Tenant>,
    users: HashMap<UserId, User>,
}

impl Tables {
    fn tenant_by_email(&self, email: &str) -> Option<&Tenant> {
        by_email(&self.tenants, email)
    }

    fn user_by_email(&self, email: &str) -> Option<&User> {
        by_email(&self.users, email)
    }

    fn insert_tenant(&mut self, new: NewTenant) -> Result<Tenant, StoreError> {
        if self.tenant_by_email(new.email()).is_some() {
            return Err(StoreError::UniqueViolation(UniqueKey::TenantEmail));
        }
        Ok(insert(&mut self.tenants, Tenant::create(new, Utc::now())))
    }

    fn insert_user(&mut self, new: NewUser) -> Result<User, StoreError> {
        if !self.tenants.contains_key(&new.tenant_id()) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "tenant {} does not exist",
                new.tenant_id()
            )));
        }
        if self.user_by_email(new.email()).is_some() {
            return Err(StoreError::UniqueViolation(UniqueKey::UserEmail));
        }
        Ok(insert(&mut self.users, User::create(new, Utc::now())))
    }
}

fn by_email<'a, E: Entity>(table: &'a HashMap<E::Id, E>, email: &str) -> Option<&'a E> {
    table.values().find(|record| record.email() == email)
}

fn insert<E: Entity + Clone>(table: &mut HashMap<E::Id, E>, record: E) -> E {
    table.insert(record.id(), record.clone());
    record
}

/// In-memory credential store for tests/dev.
///
/// Transactions are serialized: `begin` takes the table lock and holds it
/// until the transaction is committed, rolled back or dropped. Writes land on
/// a staged copy that replaces the tables on commit.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_tenant_by_id(&self, id: TenantId) -> Result<Option<Tenant>, StoreError> {
        Ok(self.tables.lock().await.tenants.get(&id).cloned())
    }

    async fn find_tenant_by_email(&self, email: &str) -> Result<Option<Tenant>, StoreError> {
        Ok(self.tables.lock().await.tenant_by_email(email).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.tables.lock().await.user_by_email(email).cloned())
    }

    async fn list_users_by_tenant(&self, tenant_id: TenantId) -> Result<Vec<User>, StoreError> {
        let tables = self.tables.lock().await;
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| u.tenant_id == tenant_id)
            .cloned()
            .collect();
        users.sort_by_key(|u| (u.created_at, u.id));
        Ok(users)
    }

    async fn begin(&self) -> Result<Box<dyn CredentialTransaction>, StoreError> {
        let guard = self.tables.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryTransaction { guard, staged }))
    }
}

struct InMemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
}

#[async_trait]
impl CredentialTransaction for InMemoryTransaction {
    async fn find_tenant_by_id(&mut self, id: TenantId) -> Result<Option<Tenant>, StoreError> {
        Ok(self.staged.tenants.get(&id).cloned())
    }

    async fn find_tenant_by_email(&mut self, email: &str) -> Result<Option<Tenant>, StoreError> {
        Ok(self.staged.tenant_by_email(email).cloned())
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.staged.user_by_email(email).cloned())
    }

    async fn create_tenant(&mut self, tenant: NewTenant) -> Result<Tenant, StoreError> {
        self.staged.insert_tenant(tenant)
    }

    async fn create_user(&mut self, user: NewUser) -> Result<User, StoreError> {
        self.staged.insert_user(user)
    }

    async fn delete_all_users(&mut self) -> Result<u64, StoreError> {
        let removed = self.staged.users.len() as u64;
        self.staged.users.clear();
        Ok(removed)
    }

    async fn delete_all_tenants(&mut self) -> Result<u64, StoreError> {
        if !self.staged.users.is_empty() {
            return Err(StoreError::ForeignKeyViolation(
                "users still reference tenants".to_string(),
            ));
        }
        let removed = self.staged.tenants.len() as u64;
        self.staged.tenants.clear();
        Ok(removed)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let InMemoryTransaction { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}
