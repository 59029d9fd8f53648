use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match services.identity.login(&body.email, &body.password).await {
        Ok(ok) => (StatusCode::OK, Json(dto::LoginResponse::success(ok))).into_response(),
        Err(e) => errors::identity_error_to_response(e),
    }
}
