//! Tenant resolution: the check every tenant-scoped request must pass.

use tenantgate_core::{Tenant, TenantId};

use super::{IdentityError, IdentityService};

/// Syntactic check: the identifier is present and not blank.
///
/// Never touches the store.
pub fn require_tenant_identifier(raw: Option<&str>) -> Result<&str, IdentityError> {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(IdentityError::TenantIdentifierMissing),
    }
}

impl IdentityService {
    /// Resolve the tenant a request claims to act for. Read-only.
    ///
    /// A value that cannot be an identifier is reported as `TenantNotFound`
    /// without a store round-trip.
    pub async fn resolve_tenant(&self, raw: Option<&str>) -> Result<Tenant, IdentityError> {
        let raw = require_tenant_identifier(raw)?;
        let Ok(tenant_id) = raw.parse::<TenantId>() else {
            tracing::debug!("tenant identifier is not a valid id");
            return Err(IdentityError::TenantNotFound);
        };

        match self.store.find_tenant_by_id(tenant_id).await? {
            Some(tenant) => Ok(tenant),
            None => {
                tracing::debug!(%tenant_id, "tenant not found");
                Err(IdentityError::TenantNotFound)
            }
        }
    }
}
