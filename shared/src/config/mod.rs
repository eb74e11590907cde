//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Token issuance, verification and rotation configuration
//! - `database` - User store connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server and CORS configuration

pub mod auth;
pub mod database;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use auth::{JwtConfig, MAX_LEEWAY_SECS, MAX_TOKEN_LIFETIME_SECS};
pub use database::DatabaseConfig;
pub use environment::{Environment, LoggingConfig};
pub use server::{CorsConfig, ServerConfig};

/// Configuration rejected by [`AppConfig::validate`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting: {field}")]
    Missing { field: &'static str },

    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Token configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            cors: CorsConfig::default(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Check invariants the token lifecycle relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.issuer.trim().is_empty() {
            return Err(ConfigError::Missing { field: "jwt.issuer" });
        }
        if self.jwt.access_token_expiry <= 0 {
            return Err(ConfigError::Invalid {
                field: "jwt.access_token_expiry",
                reason: "must be positive".to_string(),
            });
        }
        if self.jwt.refresh_token_expiry > MAX_TOKEN_LIFETIME_SECS {
            return Err(ConfigError::Invalid {
                field: "jwt.refresh_token_expiry",
                reason: format!("must not exceed {} seconds", MAX_TOKEN_LIFETIME_SECS),
            });
        }
        if self.jwt.refresh_token_expiry < self.jwt.access_token_expiry {
            return Err(ConfigError::Invalid {
                field: "jwt.refresh_token_expiry",
                reason: "must not be shorter than the access token expiry".to_string(),
            });
        }
        if self.jwt.leeway > MAX_LEEWAY_SECS {
            return Err(ConfigError::Invalid {
                field: "jwt.leeway",
                reason: format!("must not exceed {} seconds", MAX_LEEWAY_SECS),
            });
        }
        if self.jwt.refresh_cookie_name.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "jwt.refresh_cookie_name",
            });
        }
        if self.database.url.is_empty() {
            return Err(ConfigError::Missing { field: "database.url" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(AppConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_empty_issuer_rejected() {
        let mut config = AppConfig::default();
        config.jwt.issuer = "  ".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::Missing { field: "jwt.issuer" })
        );
    }

    #[test]
    fn test_out_of_range_lifetimes_rejected() {
        let mut config = AppConfig::default();
        config.jwt.access_token_expiry = i64::MAX;
        config.jwt.refresh_token_expiry = i64::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "jwt.refresh_token_expiry", .. })
        ));

        let mut config = AppConfig::default();
        config.jwt.refresh_token_expiry = MAX_TOKEN_LIFETIME_SECS;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_excessive_leeway_rejected() {
        let mut config = AppConfig::default();
        config.jwt.leeway = u64::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "jwt.leeway", .. })
        ));
    }

    #[test]
    fn test_refresh_shorter_than_access_rejected() {
        let mut config = AppConfig::default();
        config.jwt.access_token_expiry = 3600;
        config.jwt.refresh_token_expiry = 60;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "jwt.refresh_token_expiry", .. })
        ));
    }
}
