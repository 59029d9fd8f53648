//! Tenant record: the isolation boundary that owns users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DomainError, DomainResult, Entity, TenantId};

/// A customer/organization boundary.
///
/// `email` is unique across all tenants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Tenant {
    pub fn create(new: NewTenant, created_at: DateTime<Utc>) -> Self {
        Self {
            id: TenantId::new(),
            name: new.name,
            email: new.email,
            created_at,
        }
    }
}

impl Entity for Tenant {
    type Id = TenantId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn email(&self) -> &str {
        &self.email
    }
}

/// Validated input for a tenant row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTenant {
    name: String,
    email: String,
}

impl NewTenant {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> DomainResult<Self> {
        Ok(Self {
            name: required("tenant name", name.into())?,
            email: email_address("tenant email", email.into())?,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

pub(crate) fn required(field: &'static str, value: String) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Required { field });
    }
    Ok(trimmed.to_string())
}

/// Minimal shape check; emails are stored exactly as given (after trimming).
pub(crate) fn email_address(field: &'static str, value: String) -> DomainResult<String> {
    let value = required(field, value)?;
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(value)
        }
        _ => Err(DomainError::InvalidEmail { field }),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn new_tenant_trims_fields() {
        let t = NewTenant::new("  Acme ", " acme@co ").unwrap();
        assert_eq!(t.name, "Acme");
        assert_eq!(t.email(), "acme@co");
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = NewTenant::new("   ", "acme@co").unwrap_err();
        assert_eq!(err, DomainError::Required { field: "tenant name" });
        assert_eq!(err.to_string(), "tenant name must not be empty");
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["acme", "@co", "acme@", "a@b@c"] {
            assert_eq!(
                NewTenant::new("Acme", bad).unwrap_err(),
                DomainError::InvalidEmail { field: "tenant email" },
                "{bad} accepted"
            );
        }
    }

    #[test]
    fn email_case_is_preserved() {
        let t = NewTenant::new("Acme", "Admin@Acme.CO").unwrap();
        assert_eq!(t.email(), "Admin@Acme.CO");
    }

    proptest! {
        #[test]
        fn well_formed_emails_survive_trimmed(
            local in "[a-zA-Z0-9._+-]{1,16}",
            domain in "[a-zA-Z0-9.-]{1,16}",
            pad in " {0,3}",
        ) {
            let raw = format!("{pad}{local}@{domain}{pad}");
            let t = NewTenant::new("Acme", raw).unwrap();
            prop_assert_eq!(t.email(), format!("{local}@{domain}"));
        }
    }
}
