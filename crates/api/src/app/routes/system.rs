use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::dto::ServiceInfo;
use crate::context::{SessionContext, TenantContext};

pub async fn info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(
    Extension(tenant): Extension<TenantContext>,
    Extension(session): Extension<SessionContext>,
) -> impl IntoResponse {
    Json(serde_json::json!({
        "tenant": tenant.tenant(),
        "claims": session.claims(),
    }))
}
