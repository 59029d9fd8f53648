use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::app::services::AppServices;
use crate::middleware;

pub mod auth;
pub mod system;
pub mod tenants;
pub mod users;

/// Routes exempt from the gate, plus `/tenant` whose GET and DELETE need a
/// resolved tenant.
pub fn router(services: Arc<AppServices>) -> Router {
    Router::new().route("/auth/login", post(auth::login)).route(
        "/tenant",
        post(tenants::create_tenant).merge(
            get(tenants::tenant_exists)
                .delete(tenants::purge_all)
                .route_layer(axum::middleware::from_fn_with_state(services, middleware::resolve_tenant)),
        ),
    )
}

/// Routes that need a resolved [`crate::context::TenantContext`].
pub fn scoped_router(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/users", post(users::create_user).get(users::list_users))
        .route(
            "/whoami",
            get(system::whoami).route_layer(axum::middleware::from_fn_with_state(
                services,
                middleware::authenticate,
            )),
        )
}
