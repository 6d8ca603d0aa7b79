//! Domain-specific error types and error handling.
//!
//! Errors are returned as values; the transport layer maps
//! [`DomainError::error_code`] to its own status codes.

mod types;


pub use sl_shared::validation::ValidationError;
pub use types::TokenError;

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    /// Shorthand for a user that cannot be resolved
    pub fn user_not_found() -> Self {
        DomainError::NotFound {
            resource: "User".to_string(),
        }
    }

    /// Stable machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } | DomainError::ValidationErr(_) => "VALIDATION_ERROR",
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::Storage { .. } => "STORAGE_ERROR",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::Token(err) => err.error_code(),
        }
    }

    /// Whether this error means the caller could not be identified
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound { .. })
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
