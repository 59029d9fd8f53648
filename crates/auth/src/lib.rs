//! `tenantgate-auth`: credential hashing and session tokens.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod config;
pub mod error;
pub mod password;
pub mod token;

pub use claims::SessionClaims;
pub use config::AuthConfig;
pub use error::{AuthError, TokenError};
pub use password::PasswordHasher;
pub use token::TokenIssuer;
