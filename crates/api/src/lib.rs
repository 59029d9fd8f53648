//! HTTP boundary: configuration, tenant gate middleware and routes.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
