//! Error types for authentication, token handling, key loading and storage
//!
//! Messages are intentionally generic. The presentation layer decides what is
//! exposed to clients, and nothing here embeds raw signing-library or
//! database error text in a `Display` that reaches a response body.

use std::fmt;

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hashing failed")]
    HashingFailed,
}

/// Why a token was classified as invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Not three base64url segments, undecodable header or payload
    Malformed,
    /// Signature does not match the public key
    BadSignature,
    /// Header names an algorithm other than the one keys were loaded for
    Algorithm,
    /// Token scope differs from the scope expected by the call site
    ScopeMismatch,
    IssuerMismatch,
    SubjectMismatch,
    AudienceMismatch,
    /// A registered claim is empty or zero
    MissingClaim,
    /// Subject is not a valid user identifier
    InvalidSubject,
    /// `iat` lies beyond the tolerated clock skew
    IssuedInFuture,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Malformed => "malformed token",
            Self::BadSignature => "bad signature",
            Self::Algorithm => "unexpected algorithm",
            Self::ScopeMismatch => "scope mismatch",
            Self::IssuerMismatch => "issuer mismatch",
            Self::SubjectMismatch => "subject mismatch",
            Self::AudienceMismatch => "audience mismatch",
            Self::MissingClaim => "missing claim",
            Self::InvalidSubject => "invalid subject",
            Self::IssuedInFuture => "issued in the future",
        };
        f.write_str(text)
    }
}

/// Token-related errors
///
/// `Expired` is the only variant eligible for transparent rotation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token missing")]
    Missing,

    #[error("Token malformed")]
    Malformed,

    #[error("Token has invalid scope")]
    InvalidScope,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {reason}")]
    Invalid { reason: InvalidReason },

    #[error("Token signing failed")]
    SigningFailed,
}

impl From<InvalidReason> for TokenError {
    fn from(reason: InvalidReason) -> Self {
        match reason {
            InvalidReason::ScopeMismatch => Self::InvalidScope,
            reason => Self::Invalid { reason },
        }
    }
}

/// Which half of the signing keypair an operation concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Private,
    Public,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private => f.write_str("private"),
            Self::Public => f.write_str("public"),
        }
    }
}

/// Key loading failures
///
/// Cloneable so a memoized failure can be handed to every caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("{kind} key source missing: {location}")]
    SourceMissing { kind: KeyKind, location: String },

    #[error("{kind} key envelope malformed: {detail}")]
    MalformedEnvelope { kind: KeyKind, detail: String },

    #[error("{kind} key has wrong type: {detail}")]
    WrongKeyType { kind: KeyKind, detail: String },
}

/// User store failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("Storage unavailable")]
    Unavailable { message: String },

    #[error("Storage query failed")]
    Query { message: String },
}
