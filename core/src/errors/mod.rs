//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

// Re-export all error types
pub use types::{AttendanceError, AuthError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Attendance(#[from] AttendanceError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    /// Stable machine-readable identifier for this error
    ///
    /// Presentation layers map these codes to status codes and localized messages.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::Attendance(e) => match e {
                AttendanceError::AlreadyClockedIn => "ALREADY_CLOCKED_IN",
                AttendanceError::NotClockedIn => "NOT_CLOCKED_IN",
            },
            DomainError::Auth(e) => match e {
                AuthError::InvalidOrExpiredCode => "INVALID_OR_EXPIRED_CODE",
                AuthError::UnverifiedAccount => "UNVERIFIED_ACCOUNT",
                AuthError::Unauthorized => "UNAUTHORIZED",
            },
            DomainError::Token(e) => match e {
                TokenError::TokenExpired => "TOKEN_EXPIRED",
                TokenError::InvalidTokenFormat => "INVALID_TOKEN_FORMAT",
                TokenError::InvalidSignature => "INVALID_SIGNATURE",
                TokenError::TokenNotYetValid => "TOKEN_NOT_YET_VALID",
                TokenError::InvalidClaims => "INVALID_CLAIMS",
                TokenError::TokenGenerationFailed => "TOKEN_GENERATION_FAILED",
            },
            DomainError::ValidationErr(_) => "VALIDATION_ERROR",
        }
    }

    /// Shorthand for a missing resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        DomainError::NotFound {
            resource: resource.into(),
        }
    }

    /// Shorthand for an unexpected infrastructure or data failure
    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
