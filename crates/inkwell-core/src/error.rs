//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
///
/// Every variant except `Internal` is a recoverable, user-facing outcome.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: i32 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("That username is taken. Choose a different one, please.")]
    DuplicateUsername,

    #[error("Email is already registered.")]
    DuplicateEmail,

    #[error("Login unsuccessful. Please check email and password")]
    InvalidCredentials,

    #[error("Old password is wrong!")]
    WrongOldPassword,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("You are not allowed to perform this action")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: i32) -> Self {
        Self::NotFound { entity_type, id }
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
            // Unique/foreign key races the services could not see coming.
            RepoError::Constraint(msg) => DomainError::Validation(msg),
            other => DomainError::Internal(other.to_string()),
        }
    }
}
