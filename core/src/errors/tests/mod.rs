//! Unit tests for domain error types

use crate::errors::{AttendanceError, AuthError, DomainError, TokenError, ValidationError};

#[test]
fn test_bridged_errors_keep_their_message() {
    let error: DomainError = AttendanceError::AlreadyClockedIn.into();
    assert_eq!(error.to_string(), "Already clocked in");

    let error: DomainError = AuthError::InvalidOrExpiredCode.into();
    assert_eq!(error.to_string(), "Invalid or expired code");
}

#[test]
fn test_error_codes() {
    assert_eq!(DomainError::from(AttendanceError::AlreadyClockedIn).code(), "ALREADY_CLOCKED_IN");
    assert_eq!(DomainError::from(AttendanceError::NotClockedIn).code(), "NOT_CLOCKED_IN");
    assert_eq!(DomainError::from(AuthError::UnverifiedAccount).code(), "UNVERIFIED_ACCOUNT");
    assert_eq!(DomainError::from(AuthError::Unauthorized).code(), "UNAUTHORIZED");
    assert_eq!(DomainError::from(TokenError::TokenExpired).code(), "TOKEN_EXPIRED");
    assert_eq!(DomainError::not_found("Subject").code(), "NOT_FOUND");
    assert_eq!(DomainError::internal("db down").code(), "INTERNAL_ERROR");
    assert_eq!(
        DomainError::from(ValidationError::InvalidEmail).code(),
        "VALIDATION_ERROR"
    );
}

#[test]
fn test_validation_error_with_fields() {
    let error = ValidationError::InvalidLength {
        field: "new_password".to_string(),
        min: 8,
        max: 128,
        actual: 3,
    };
    let message = error.to_string();
    assert!(message.contains("new_password"));
    assert!(message.contains("actual: 3"));
}

#[test]
fn test_internal_error_message() {
    let error = DomainError::internal("connection refused");
    assert_eq!(error.to_string(), "Internal error: connection refused");
}
