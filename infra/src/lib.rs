//! # Infrastructure Layer
//!
//! Concrete storage for the Keystone token service. The domain layer only
//! sees the [`ks_core::repositories::UserRepository`] trait; this crate
//! provides the MySQL implementation behind it along with connection pool
//! management.
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Configuration consumed by the infrastructure layer
pub mod config {
    pub use ks_shared::config::DatabaseConfig;
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
