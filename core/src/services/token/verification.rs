//! Outcome of verifying a signed token

use crate::domain::entities::Claims;
use crate::errors::{InvalidReason, TokenError};

/// Result of [`TokenService::verify`](super::TokenService::verify)
///
/// `ExpiredOnly` is reported only when expiry is the sole failing check;
/// a token that is both expired and wrong in any other way is `Invalid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Valid(Claims),
    ExpiredOnly(Claims),
    Invalid(InvalidReason),
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn is_expired_only(&self) -> bool {
        matches!(self, Self::ExpiredOnly(_))
    }

    /// Claims of a valid or merely expired token
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Self::Valid(claims) | Self::ExpiredOnly(claims) => Some(claims),
            Self::Invalid(_) => None,
        }
    }

    /// Collapses the outcome into claims or the matching token error
    pub fn into_result(self) -> Result<Claims, TokenError> {
        match self {
            Self::Valid(claims) => Ok(claims),
            Self::ExpiredOnly(_) => Err(TokenError::Expired),
            Self::Invalid(reason) => Err(reason.into()),
        }
    }
}
