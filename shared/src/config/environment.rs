//! Deployment environment and logging settings

use serde::{Deserialize, Serialize};
use std::env;

/// Where the service is running
///
/// Only CORS and the default log level differ between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Any origin may call the API; verbose logs
    #[default]
    Development,
    /// Only configured origins; quieter logs
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Read `KS_ENV`, falling back to `ENVIRONMENT`
    ///
    /// Unset or unrecognised values mean development.
    pub fn from_env() -> Self {
        env::var("KS_ENV")
            .or_else(|_| env::var("ENVIRONMENT"))
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Environment::Development => "development",
            Environment::Production => "production",
        })
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("Unknown environment '{}'", other)),
        }
    }
}

/// Log output settings, applied once at startup
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Filter directive such as `info` or `ks_core=debug,sqlx=warn`;
    /// `RUST_LOG` wins when set
    pub level: String,

    /// Prefix each line with a timestamp
    #[serde(default = "default_timestamp")]
    pub timestamp: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl LoggingConfig {
    pub fn for_environment(env: Environment) -> Self {
        let level = match env {
            Environment::Development => "debug,sqlx=info",
            Environment::Production => "info,sqlx=warn",
        };
        Self {
            level: level.to_string(),
            timestamp: default_timestamp(),
        }
    }
}

fn default_timestamp() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_str() {
        assert_eq!("dev".parse::<Environment>(), Ok(Environment::Development));
        assert_eq!(" Production ".parse::<Environment>(), Ok(Environment::Production));
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_environment_serde_names() {
        let json = serde_json::to_string(&Environment::Production).unwrap();
        assert_eq!(json, "\"production\"");
        assert_eq!(Environment::Production.to_string(), "production");
    }

    #[test]
    fn test_production_logging_is_quieter() {
        let dev = LoggingConfig::for_environment(Environment::Development);
        let prod = LoggingConfig::for_environment(Environment::Production);
        assert!(dev.level.starts_with("debug"));
        assert!(prod.level.starts_with("info"));
    }
}
