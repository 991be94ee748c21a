//! Domain-level error types.

use thiserror::Error;

use crate::ports::MediaError;

/// Message surfaced to callers whenever the backing store cannot be reached.
pub const STORE_UNAVAILABLE_MESSAGE: &str =
    "Database connection not available. Please check your database connection and configuration.";

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("Invalid {entity} id: {value}")]
    InvalidId { entity: &'static str, value: String },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{}", STORE_UNAVAILABLE_MESSAGE)]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str) -> Self {
        DomainError::NotFound { entity }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Connection(msg) => DomainError::Unavailable(msg),
            RepoError::Query(msg) => DomainError::Internal(msg),
            RepoError::NotFound => DomainError::not_found("Resource"),
            RepoError::Constraint(msg) => DomainError::Duplicate(msg),
        }
    }
}

impl From<MediaError> for DomainError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Io(msg) => DomainError::Internal(msg),
            other => DomainError::Validation(other.to_string()),
        }
    }
}
