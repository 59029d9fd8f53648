//! `tenantgate-core`: tenant and user records shared by every layer.
//!
//! This crate contains **pure domain** types (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod tenant;
pub mod user;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{TenantId, UserId};
pub use tenant::{NewTenant, Tenant};
pub use user::{NewUser, Role, User, UserProfile, validate_user_input};
