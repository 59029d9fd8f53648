//! Postgres-backed credential store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation on `tenants_email_key`) | `23505` | `UniqueViolation(TenantEmail)` |
//! | Database (unique violation on `users_email_key`) | `23505` | `UniqueViolation(UserEmail)` |
//! | Database (foreign key violation) | `23503` | `ForeignKeyViolation` |
//! | Database (other) | Any other | `Unavailable` |
//! | PoolClosed / PoolTimedOut / Io / other | N/A | `Unavailable` |
//!
//! Transactions run at the server default (read committed). The unique
//! constraints close the check-then-insert race between concurrent creators.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Executor, PgPool, Postgres, Row, Transaction};
use tracing::instrument;
use uuid::Uuid;

use tenantgate_core::{NewTenant, NewUser, Role, Tenant, TenantId, User, UserId};

use super::r#trait::{CredentialStore, CredentialTransaction, StoreError, UniqueKey};

const SCHEMA: &str = include_str!("../../migrations/0001_identity.sql");

/// Postgres-backed credential store.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool, which is `Send + Sync`; clones share it.
#[derive(Debug, Clone)]
pub struct PostgresCredentialStore {
    pool: Arc<PgPool>,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Apply the schema. Idempotent.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_tenant_by_id(&self, id: TenantId) -> Result<Option<Tenant>, StoreError> {
        select_tenant_by_id(&*self.pool, id).await
    }

    async fn find_tenant_by_email(&self, email: &str) -> Result<Option<Tenant>, StoreError> {
        select_tenant_by_email(&*self.pool, email).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        select_user_by_email(&*self.pool, email).await
    }

    async fn list_users_by_tenant(&self, tenant_id: TenantId) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, role, tenant_id, created_at
            FROM users
            WHERE tenant_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(tenant_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_users_by_tenant", e))?;

        rows.iter().map(user_from_row).collect()
    }

    async fn begin(&self) -> Result<Box<dyn CredentialTransaction>, StoreError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;
        Ok(Box::new(PostgresTransaction { tx }))
    }
}

/// Dropping without `commit` rolls back (SQLx semantics).
struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CredentialTransaction for PostgresTransaction {
    async fn find_tenant_by_id(&mut self, id: TenantId) -> Result<Option<Tenant>, StoreError> {
        select_tenant_by_id(&mut *self.tx, id).await
    }

    async fn find_tenant_by_email(&mut self, email: &str) -> Result<Option<Tenant>, StoreError> {
        select_tenant_by_email(&mut *self.tx, email).await
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, StoreError> {
        select_user_by_email(&mut *self.tx, email).await
    }

    async fn create_tenant(&mut self, tenant: NewTenant) -> Result<Tenant, StoreError> {
        let tenant = Tenant::create(tenant, Utc::now());
        let row = sqlx::query(
            r#"
            INSERT INTO tenants (id, name, email, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(tenant.id.as_uuid())
        .bind(&tenant.name)
        .bind(&tenant.email)
        .bind(tenant.created_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("create_tenant", e))?;

        tenant_from_row(&row)
    }

    async fn create_user(&mut self, user: NewUser) -> Result<User, StoreError> {
        let user = User::create(user, Utc::now());
        let row = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, tenant_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, email, password_hash, role, tenant_id, created_at
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.tenant_id.as_uuid())
        .bind(user.created_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("create_user", e))?;

        user_from_row(&row)
    }

    async fn delete_all_users(&mut self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM users")
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("delete_all_users", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_all_tenants(&mut self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM tenants")
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("delete_all_tenants", e))?;
        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx
            .commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| map_sqlx_error("rollback", e))
    }
}

async fn select_tenant_by_id<'e, E>(executor: E, id: TenantId) -> Result<Option<Tenant>, StoreError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query("SELECT id, name, email, created_at FROM tenants WHERE id = $1")
        .bind(id.as_uuid())
        .fetch_optional(executor)
        .await
        .map_err(|e| map_sqlx_error("find_tenant_by_id", e))?
        .as_ref()
        .map(tenant_from_row)
        .transpose()
}

async fn select_tenant_by_email<'e, E>(executor: E, email: &str) -> Result<Option<Tenant>, StoreError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query("SELECT id, name, email, created_at FROM tenants WHERE email = $1")
        .bind(email)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_sqlx_error("find_tenant_by_email", e))?
        .as_ref()
        .map(tenant_from_row)
        .transpose()
}

async fn select_user_by_email<'e, E>(executor: E, email: &str) -> Result<Option<User>, StoreError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query("SELECT id, name, email, password_hash, role, tenant_id, created_at FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_sqlx_error("find_user_by_email", e))?
        .as_ref()
        .map(user_from_row)
        .transpose()
}

fn tenant_from_row(row: &PgRow) -> Result<Tenant, StoreError> {
    Ok(Tenant {
        id: TenantId::from_uuid(column::<Uuid>(row, "id")?),
        name: column(row, "name")?,
        email: column(row, "email")?,
        created_at: column::<DateTime<Utc>>(row, "created_at")?,
    })
}

fn user_from_row(row: &PgRow) -> Result<User, StoreError> {
    let role: String = column(row, "role")?;
    Ok(User {
        id: UserId::from_uuid(column::<Uuid>(row, "id")?),
        name: column(row, "name")?,
        email: column(row, "email")?,
        password_hash: column(row, "password_hash")?,
        role: role
            .parse::<Role>()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        tenant_id: TenantId::from_uuid(column::<Uuid>(row, "tenant_id")?),
        created_at: column::<DateTime<Utc>>(row, "created_at")?,
    })
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get::<T, _>(name)
        .map_err(|e| StoreError::Corrupt(format!("column {name}: {e}")))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => match db_err.constraint() {
                    Some("tenants_email_key") => StoreError::UniqueViolation(UniqueKey::TenantEmail),
                    Some("users_email_key") => StoreError::UniqueViolation(UniqueKey::UserEmail),
                    _ => StoreError::Unavailable(msg),
                },
                Some("23503") => StoreError::ForeignKeyViolation(msg),
                _ => StoreError::Unavailable(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool timed out in {}", operation))
        }
        _ => StoreError::Unavailable(format!("sqlx error in {}: {}", operation, err)),
    }
}
