use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn create_tenant(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateTenantRequest>,
) -> axum::response::Response {
    match services.identity.create_tenant(body.into()).await {
        Ok(admin) => (StatusCode::CREATED, Json(admin)).into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}

pub async fn tenant_exists(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::TenantExistsQuery>,
) -> axum::response::Response {
    match services.identity.tenant_exists(&query.email).await {
        Ok(exists) => (StatusCode::OK, Json(dto::TenantExistsResponse { exists })).into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}

pub async fn purge_all(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.identity.purge_all().await {
        Ok(summary) => (StatusCode::OK, Json(dto::PurgeResponse::from(summary))).into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}
