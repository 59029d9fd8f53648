use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Input rejected before it reaches a store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{field} must not be empty")]
    Required { field: &'static str },

    #[error("{field} is not an email address")]
    InvalidEmail { field: &'static str },

    #[error("password must not be empty")]
    EmptyPassword,

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("invalid {kind}: {reason}")]
    InvalidId { kind: &'static str, reason: String },
}
