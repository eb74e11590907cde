//! Unit tests for domain error types

use crate::errors::{
    AuthError, DomainError, InvalidReason, KeyError, KeyKind, StorageError, TokenError,
};

#[test]
fn test_token_error_messages() {
    assert_eq!(TokenError::Expired.to_string(), "Token expired");
    let error = TokenError::Invalid {
        reason: InvalidReason::BadSignature,
    };
    assert_eq!(error.to_string(), "Invalid token: bad signature");
}

#[test]
fn test_key_error_carries_kind() {
    let error = KeyError::WrongKeyType {
        kind: KeyKind::Public,
        detail: "not an EC key".to_string(),
    };
    assert!(error.to_string().starts_with("public key has wrong type"));
}

#[test]
fn test_storage_error_hides_driver_text() {
    let error = StorageError::Query {
        message: "Table 'users' doesn't exist".to_string(),
    };
    assert_eq!(error.to_string(), "Storage query failed");
}

#[test]
fn test_domain_error_from_conversions() {
    let error: DomainError = TokenError::Missing.into();
    assert_eq!(error, DomainError::Token(TokenError::Missing));
    assert!(error.is_authentication_failure());

    let error: DomainError = AuthError::UserNotFound.into();
    assert!(error.is_authentication_failure());

    let error: DomainError = StorageError::Timeout { after_ms: 10 }.into();
    assert!(!error.is_authentication_failure());
}
