//! Credential store: durable tenants and users behind a transactional seam.

mod r#trait;
pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryCredentialStore;
pub use postgres::PostgresCredentialStore;
pub use r#trait::{CredentialStore, CredentialTransaction, StoreError, UniqueKey};
