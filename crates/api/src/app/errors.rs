use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use tenantgate_infra::identity::{IdentityError, INVALID_CREDENTIALS_MESSAGE};

use crate::app::dto::LoginResponse;

pub fn identity_error_to_response(err: IdentityError) -> axum::response::Response {
    match err {
        IdentityError::TenantIdentifierMissing => {
            json_error(StatusCode::BAD_REQUEST, "tenant_id_required", "Tenant ID is required")
        }
        IdentityError::TenantNotFound => json_error(StatusCode::BAD_REQUEST, "invalid_tenant", "Invalid tenant ID"),
        IdentityError::TenantAlreadyExists => {
            json_error(StatusCode::CONFLICT, "tenant_exists", "Tenant with this email already exists")
        }
        IdentityError::UserAlreadyExists => {
            json_error(StatusCode::CONFLICT, "user_exists", "User with this email already exists")
        }
        IdentityError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            axum::Json(LoginResponse::failure(INVALID_CREDENTIALS_MESSAGE)),
        )
            .into_response(),
        IdentityError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        IdentityError::StoreUnavailable(msg) => {
            tracing::error!(error = %msg, "credential store unavailable");
            json_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "store_unavailable",
                "Service temporarily unavailable",
            )
        }
        IdentityError::Internal(msg) => {
            tracing::error!(error = %msg, "internal error");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Internal server error")
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
