//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

// Re-export all error types
pub use types::{AuthError, InvalidReason, KeyError, KeyKind, StorageError, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DomainError {
    /// Whether the failure comes from the caller's credentials rather than the server
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::Token(_) | Self::Auth(AuthError::UserNotFound | AuthError::InvalidCredentials)
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
