use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::Span;

use tenantgate_infra::identity::{IdentityError, require_tenant_identifier};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::{SessionContext, TenantContext};

/// Request header naming the tenant a call belongs to.
pub const TENANT_HEADER: &str = "x-tenant";

/// The trimmed `x-tenant` value, or `None` when absent or blank.
///
/// A value that is not visible ASCII is treated as absent.
pub fn extract_tenant_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(TENANT_HEADER)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Routes reachable without a tenant header.
pub fn is_exempt(method: &Method, path: &str) -> bool {
    match *method {
        Method::GET => path == "/" || path == "/health",
        Method::POST => path == "/tenant" || path.starts_with("/auth/"),
        _ => false,
    }
}

/// Syntactic gate: rejects non-exempt requests without an `x-tenant` header.
/// Never touches the store.
pub async fn require_tenant_header(req: Request, next: Next) -> Response {
    if !is_exempt(req.method(), req.uri().path()) {
        if let Err(e) = require_tenant_identifier(extract_tenant_id(req.headers())) {
            return errors::identity_error_to_response(e);
        }
    }
    next.run(req).await
}

/// Store-backed gate: resolves the header to a tenant and attaches a
/// [`TenantContext`].
pub async fn resolve_tenant(
    State(services): State<Arc<AppServices>>,
    mut req: Request,
    next: Next,
) -> Response {
    let tenant = match services.identity.resolve_tenant(extract_tenant_id(req.headers())).await {
        Ok(tenant) => tenant,
        Err(e) => return errors::identity_error_to_response(e),
    };

    Span::current().record("tenant_id", tracing::field::display(tenant.id));
    req.extensions_mut().insert(TenantContext::new(tenant));
    next.run(req).await
}

/// Verifies the bearer token and requires it to belong to the resolved tenant.
/// Must run inside [`resolve_tenant`].
pub async fn authenticate(
    State(services): State<Arc<AppServices>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer(req.headers()) else {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "missing bearer token");
    };

    let claims = match services.identity.tokens().verify(token) {
        Ok(claims) => claims,
        Err(_) => {
            return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "invalid or expired token");
        }
    };

    let Some(tenant) = req.extensions().get::<TenantContext>() else {
        return errors::identity_error_to_response(IdentityError::Internal(
            "authenticate ran without a resolved tenant".into(),
        ));
    };
    if claims.tenant_id != tenant.tenant_id() {
        tracing::warn!(tenant_id = %tenant.tenant_id(), token_tenant_id = %claims.tenant_id, "token tenant mismatch");
        return errors::json_error(
            StatusCode::FORBIDDEN,
            "tenant_mismatch",
            "token does not belong to this tenant",
        );
    }

    Span::current().record("user_id", tracing::field::display(claims.user_id));
    req.extensions_mut().insert(SessionContext::new(claims));
    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use proptest::prelude::*;

    use super::*;

    fn headers(name: &'static str, value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(name, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn tenant_header_absent_or_blank_is_none() {
        assert_eq!(extract_tenant_id(&HeaderMap::new()), None);
        assert_eq!(extract_tenant_id(&headers(TENANT_HEADER, "")), None);
        assert_eq!(extract_tenant_id(&headers(TENANT_HEADER, "   ")), None);
        assert_eq!(extract_tenant_id(&headers("x-tenant-id", "abc")), None);
    }

    #[test]
    fn tenant_header_is_trimmed() {
        assert_eq!(extract_tenant_id(&headers(TENANT_HEADER, " abc ")), Some("abc"));
    }

    #[test]
    fn exempt_routes() {
        assert!(is_exempt(&Method::GET, "/"));
        assert!(is_exempt(&Method::GET, "/health"));
        assert!(is_exempt(&Method::POST, "/tenant"));
        assert!(is_exempt(&Method::POST, "/auth/login"));

        assert!(!is_exempt(&Method::GET, "/tenant"));
        assert!(!is_exempt(&Method::DELETE, "/tenant"));
        assert!(!is_exempt(&Method::GET, "/auth/login"));
        assert!(!is_exempt(&Method::POST, "/users"));
        assert!(!is_exempt(&Method::GET, "/whoami"));
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer(&headers("authorization", "Bearer abc")), Some("abc"));
        assert_eq!(extract_bearer(&headers("authorization", "Bearer  ")), None);
        assert_eq!(extract_bearer(&headers("authorization", "Basic abc")), None);
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
    }

    proptest! {
        #[test]
        fn extracted_tenant_id_is_trimmed_and_non_empty(value in "[ -~]{0,64}") {
            let h = headers(TENANT_HEADER, &value);
            match extract_tenant_id(&h) {
                Some(id) => {
                    prop_assert_eq!(id, value.trim());
                    prop_assert!(!id.is_empty());
                }
                None => prop_assert!(value.trim().is_empty()),
            }
        }
    }
}
