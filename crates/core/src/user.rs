//! User record and its public projection.
//!
//! A user belongs to exactly one tenant. `tenant_id` and `role` are fixed by
//! the constructor that provisions the user and have no setters.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tenant::{email_address, required};
use crate::{DomainError, DomainResult, Entity, TenantId, UserId};

/// Two-level role.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

/// Stored user row. Never serialized: use [`UserProfile`] for output.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub tenant_id: TenantId,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn create(new: NewUser, created_at: DateTime<Utc>) -> Self {
        Self {
            id: UserId::new(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            tenant_id: new.tenant_id,
            created_at,
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            tenant_id: self.tenant_id,
            created_at: self.created_at,
        }
    }
}

impl core::fmt::Debug for User {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("tenant_id", &self.tenant_id)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn email(&self) -> &str {
        &self.email
    }
}

/// Public projection of a user (no credential material).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub tenant_id: TenantId,
    pub created_at: DateTime<Utc>,
}

/// Input for a user row. The password must already be hashed.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    name: String,
    email: String,
    password_hash: String,
    role: Role,
    tenant_id: TenantId,
}

impl NewUser {
    /// The founding user of a tenant.
    pub fn founding_admin(
        tenant_id: TenantId,
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: String,
    ) -> DomainResult<Self> {
        Self::build(tenant_id, Role::Admin, name.into(), email.into(), password_hash)
    }

    /// A regular user created through the tenant-scoped path.
    pub fn member(
        tenant_id: TenantId,
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: String,
    ) -> DomainResult<Self> {
        Self::build(tenant_id, Role::User, name.into(), email.into(), password_hash)
    }

    fn build(
        tenant_id: TenantId,
        role: Role,
        name: String,
        email: String,
        password_hash: String,
    ) -> DomainResult<Self> {
        Ok(Self {
            name: required("user name", name)?,
            email: email_address("user email", email)?,
            password_hash,
            role,
            tenant_id,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// Validate the user-facing fields before any password work is done.
pub fn validate_user_input(name: &str, email: &str, password: &str) -> DomainResult<()> {
    required("user name", name.to_string())?;
    email_address("user email", email.to_string())?;
    if password.is_empty() {
        return Err(DomainError::EmptyPassword);
    }
    Ok(())
}
