//! Configuration for the token service

use chrono::Duration;
use ks_shared::config::{JwtConfig, MAX_LEEWAY_SECS, MAX_TOKEN_LIFETIME_SECS};

use crate::domain::entities::TokenScope;
use crate::domain::value_objects::ValidationPolicy;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Issuer stamped on every token and required on verification
    pub issuer: String,
    /// Audience stamped and required when set
    pub audience: Option<String>,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_ttl: Duration,
    /// Clock skew tolerance
    pub leeway: Duration,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from(&JwtConfig::default())
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_ttl: lifetime(config.access_token_expiry),
            refresh_ttl: lifetime(config.refresh_token_expiry),
            leeway: Duration::seconds(config.leeway.min(MAX_LEEWAY_SECS) as i64),
        }
    }
}

/// Clamped to the accepted range so unvalidated input cannot overflow
fn lifetime(seconds: i64) -> Duration {
    Duration::seconds(seconds.clamp(-MAX_TOKEN_LIFETIME_SECS, MAX_TOKEN_LIFETIME_SECS))
}

impl TokenServiceConfig {
    /// Lifetime configured for a scope
    pub fn ttl(&self, scope: TokenScope) -> Duration {
        match scope {
            TokenScope::Access => self.access_ttl,
            TokenScope::Refresh => self.refresh_ttl,
        }
    }

    /// The service-wide policy: configured issuer, audience and leeway
    pub fn policy(&self) -> ValidationPolicy {
        let policy = ValidationPolicy::empty()
            .with_issuer(self.issuer.clone())
            .with_leeway(self.leeway)
            .require_issued_at();
        match &self.audience {
            Some(aud) => policy.with_audience(aud.clone()),
            None => policy,
        }
    }
}
