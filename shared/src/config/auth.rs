//! Token issuance and verification configuration

use serde::{Deserialize, Serialize};

/// Longest token lifetime accepted from configuration (ten years), in seconds
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Largest clock skew tolerance accepted from configuration (one hour), in seconds
pub const MAX_LEEWAY_SECS: u64 = 60 * 60;

/// JWT configuration for the token lifecycle
///
/// Durations are expressed in seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// JWT issuer claim, stamped on every token and required on verification
    pub issuer: String,

    /// JWT audience claim
    #[serde(default)]
    pub audience: Option<String>,

    /// Access token expiry time in seconds
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,

    /// Clock skew tolerance applied to `exp` and `iat` checks, in seconds
    #[serde(default = "default_leeway")]
    pub leeway: u64,

    /// Path to the PKCS#8 PEM encoded ES256 private key
    #[serde(default = "default_private_key_path")]
    pub private_key_path: String,

    /// Path to the PEM encoded ES256 public key
    #[serde(default = "default_public_key_path")]
    pub public_key_path: String,

    /// Name of the cookie carrying the refresh token
    #[serde(default = "default_refresh_cookie_name")]
    pub refresh_cookie_name: String,

    /// Upper bound for user store lookups during rotation, in milliseconds
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            issuer: String::from("keystone"),
            audience: None,
            access_token_expiry: default_access_token_expiry(),
            refresh_token_expiry: default_refresh_token_expiry(),
            leeway: default_leeway(),
            private_key_path: default_private_key_path(),
            public_key_path: default_public_key_path(),
            refresh_cookie_name: default_refresh_cookie_name(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with issuer
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: std::env::var("JWT_AUDIENCE").ok().filter(|a| !a.is_empty()),
            access_token_expiry: std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.access_token_expiry),
            refresh_token_expiry: std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.refresh_token_expiry),
            leeway: std::env::var("JWT_LEEWAY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.leeway),
            private_key_path: std::env::var("JWT_PRIVATE_KEY_PATH")
                .unwrap_or(defaults.private_key_path),
            public_key_path: std::env::var("JWT_PUBLIC_KEY_PATH")
                .unwrap_or(defaults.public_key_path),
            refresh_cookie_name: std::env::var("JWT_REFRESH_COOKIE")
                .unwrap_or(defaults.refresh_cookie_name),
            store_timeout_ms: std::env::var("JWT_STORE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.store_timeout_ms),
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in hours
    pub fn with_refresh_expiry_hours(mut self, hours: i64) -> Self {
        self.refresh_token_expiry = hours * 3600;
        self
    }

    /// Set the clock skew tolerance in seconds
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> i64 {
    86400 // 24 hours
}

fn default_leeway() -> u64 {
    5
}

fn default_private_key_path() -> String {
    String::from("keys/jwt_private_key.pem")
}

fn default_public_key_path() -> String {
    String::from("keys/jwt_public_key.pem")
}

fn default_refresh_cookie_name() -> String {
    String::from("_rt")
}

fn default_store_timeout_ms() -> u64 {
    2000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 86400);
        assert_eq!(config.refresh_cookie_name, "_rt");
        assert!(config.audience.is_none());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("auth.example.com")
            .with_access_expiry_minutes(30)
            .with_refresh_expiry_hours(48)
            .with_leeway(10);

        assert_eq!(config.issuer, "auth.example.com");
        assert_eq!(config.access_token_expiry, 1800);
        assert_eq!(config.refresh_token_expiry, 172800);
        assert_eq!(config.leeway, 10);
    }

    #[test]
    fn test_jwt_config_deserialize_with_defaults() {
        let config: JwtConfig = serde_json::from_str(r#"{"issuer": "ks"}"#).unwrap();
        assert_eq!(config.issuer, "ks");
        assert_eq!(config.leeway, 5);
        assert_eq!(config.store_timeout_ms, 2000);
    }
}
