//! Authentication response value object for API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{TokenPair, UserId};

/// Body returned after a successful login
///
/// The tokens themselves travel in the `Authorization` header and the
/// refresh cookie; the body only describes them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// Authenticated user
    pub user_id: UserId,

    /// Access token expiry
    pub access_expires_at: DateTime<Utc>,

    /// Refresh token expiry
    pub refresh_expires_at: DateTime<Utc>,
}

impl AuthResponse {
    pub fn new(user_id: UserId, pair: &TokenPair) -> Self {
        Self {
            user_id,
            access_expires_at: pair.access.expires_at,
            refresh_expires_at: pair.refresh.expires_at,
        }
    }
}
