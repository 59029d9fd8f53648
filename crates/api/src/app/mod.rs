//! Axum router and service wiring.
//!
//! - `services.rs`: store selection and identity service construction
//! - `routes/`: handlers, one file per area
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: error responses

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::Request,
    routing::get,
    Extension, Router,
};
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{info_span, Span};

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(config).await?);
    Ok(router(services))
}

pub fn router(services: Arc<AppServices>) -> Router {
    // Tenant-scoped routes: the header must name an existing tenant.
    let scoped = routes::scoped_router(services.clone()).route_layer(axum::middleware::from_fn_with_state(
        services.clone(),
        middleware::resolve_tenant,
    ));

    Router::new()
        .route("/", get(routes::system::info))
        .route("/health", get(routes::system::health))
        .merge(routes::router(services.clone()))
        .merge(scoped)
        .layer(Extension(services))
        .layer(axum::middleware::from_fn(middleware::require_tenant_header))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        tenant_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                    )
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    tracing::info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis() as u64,
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    tracing::error!("request failed: {error}");
                }),
        )
}

pub use services::AppServices;
