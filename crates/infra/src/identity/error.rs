use thiserror::Error;

use tenantgate_auth::AuthError;
use tenantgate_core::DomainError;

use crate::store::{StoreError, UniqueKey};

/// Failure of an identity flow.
///
/// Everything except `StoreUnavailable` and `Internal` is an expected outcome
/// the boundary renders as a client error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("tenant identifier is required")]
    TenantIdentifierMissing,

    #[error("tenant not found")]
    TenantNotFound,

    #[error("tenant with this email already exists")]
    TenantAlreadyExists,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user with this email already exists")]
    UserAlreadyExists,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IdentityError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, IdentityError::StoreUnavailable(_) | IdentityError::Internal(_))
    }
}

impl From<StoreError> for IdentityError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(UniqueKey::TenantEmail) => IdentityError::TenantAlreadyExists,
            StoreError::UniqueViolation(UniqueKey::UserEmail) => IdentityError::UserAlreadyExists,
            // Only user inserts reference tenants.
            StoreError::ForeignKeyViolation(_) => IdentityError::TenantNotFound,
            StoreError::Unavailable(msg) => IdentityError::StoreUnavailable(msg),
            StoreError::Corrupt(msg) => IdentityError::StoreUnavailable(format!("corrupt record: {msg}")),
        }
    }
}

impl From<DomainError> for IdentityError {
    fn from(err: DomainError) -> Self {
        IdentityError::Validation(err.to_string())
    }
}

impl From<AuthError> for IdentityError {
    fn from(err: AuthError) -> Self {
        IdentityError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_violations_become_conflicts() {
        assert_eq!(
            IdentityError::from(StoreError::UniqueViolation(UniqueKey::TenantEmail)),
            IdentityError::TenantAlreadyExists
        );
        assert_eq!(
            IdentityError::from(StoreError::UniqueViolation(UniqueKey::UserEmail)),
            IdentityError::UserAlreadyExists
        );
    }

    #[test]
    fn infrastructure_faults_are_fatal() {
        let err = IdentityError::from(StoreError::Unavailable("connection refused".into()));
        assert!(err.is_fatal());
        assert!(IdentityError::from(AuthError::Hashing("oops".into())).is_fatal());
        assert!(!IdentityError::TenantNotFound.is_fatal());
        assert!(!IdentityError::InvalidCredentials.is_fatal());
    }
}
