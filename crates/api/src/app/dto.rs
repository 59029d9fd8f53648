use serde::{Deserialize, Serialize};

use tenantgate_core::{TenantId, UserId, UserProfile};
use tenantgate_infra::identity::{CreateTenant, CreateUser, LoginSuccess, PurgeSummary};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantRequest {
    pub name: String,
    pub email: String,
    pub admin_name: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl From<CreateTenantRequest> for CreateTenant {
    fn from(r: CreateTenantRequest) -> Self {
        CreateTenant {
            name: r.name,
            email: r.email,
            admin_name: r.admin_name,
            admin_email: r.admin_email,
            admin_password: r.admin_password,
        }
    }
}

/// Unknown fields such as `role` or `tenantId` are ignored; both are fixed by
/// the server.
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(r: CreateUserRequest) -> Self {
        CreateUser {
            name: r.name,
            email: r.email,
            password: r.password,
        }
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct TenantExistsQuery {
    pub email: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl LoginResponse {
    pub fn success(login: LoginSuccess) -> Self {
        Self {
            success: true,
            message: "Login successful",
            user_id: Some(login.user_id),
            access_token: Some(login.access_token),
        }
    }

    pub fn failure(message: &'static str) -> Self {
        Self {
            success: false,
            message,
            user_id: None,
            access_token: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantExistsResponse {
    pub exists: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeResponse {
    pub deleted_users: u64,
    pub deleted_tenants: u64,
}

impl From<PurgeSummary> for PurgeResponse {
    fn from(s: PurgeSummary) -> Self {
        Self {
            deleted_users: s.users,
            deleted_tenants: s.tenants,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub tenant_id: TenantId,
    pub users: Vec<UserProfile>,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
}
