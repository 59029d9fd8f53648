use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::TenantContext;

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<dto::CreateUserRequest>,
) -> axum::response::Response {
    match services.identity.create_user(body.into(), tenant.tenant_id()).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    match services.identity.list_users(tenant.tenant_id()).await {
        Ok(users) => (
            StatusCode::OK,
            Json(dto::UserListResponse {
                tenant_id: tenant.tenant_id(),
                users,
            }),
        )
            .into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}
