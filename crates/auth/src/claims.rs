use serde::{Deserialize, Serialize};

use tenantgate_core::{Role, TenantId, User, UserId};

/// Session claims model (transport-agnostic).
///
/// This is the exact set of claims a session token carries. Once a token has
/// been verified these are trusted in place of a store lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Tenant context for the token.
    pub tenant_id: TenantId,
}

impl SessionClaims {
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            tenant_id: user.tenant_id,
        }
    }
}
