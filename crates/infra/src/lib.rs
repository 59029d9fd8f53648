//! Infrastructure layer: credential storage and the identity flows built on it.

pub mod identity;
pub mod store;

pub use identity::{IdentityError, IdentityService};
pub use store::{CredentialStore, CredentialTransaction, InMemoryCredentialStore, PostgresCredentialStore, StoreError};
