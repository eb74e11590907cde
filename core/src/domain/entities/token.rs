//! Token entities for JWT-based authentication.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Tag distinguishing access tokens from refresh tokens
///
/// Serialized as the single-letter `scp` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenScope {
    #[serde(rename = "a")]
    Access,
    #[serde(rename = "r")]
    Refresh,
}

impl TokenScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims structure for JWT payload
///
/// Registered claims default to empty values when absent so that a
/// signed-but-incomplete token is reported as a missing claim rather than
/// as an undecodable one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID, decimal)
    #[serde(default)]
    pub sub: String,

    /// Issuer
    #[serde(default)]
    pub iss: String,

    /// Issued at timestamp
    #[serde(default)]
    pub iat: i64,

    /// Expiration timestamp
    #[serde(default)]
    pub exp: i64,

    /// Token scope
    pub scp: TokenScope,

    /// Role of the subject at issuance time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl Claims {
    /// Parses the subject into a user identifier
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }

    /// Expiry as a timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        timestamp_to_datetime(self.exp)
    }

    /// Issuance time as a timestamp
    pub fn issued_at(&self) -> DateTime<Utc> {
        timestamp_to_datetime(self.iat)
    }

    /// Checks if the claims have expired at `now`, widened by `leeway` seconds
    pub fn is_expired_at(&self, now: i64, leeway: u64) -> bool {
        now >= self.exp.saturating_add(leeway as i64)
    }
}

/// A freshly signed token together with its own expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub claims: Claims,
}

/// Access and refresh tokens minted together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

pub(crate) fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(ts, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
