//! # Keystone Core
//!
//! Token lifecycle for the Keystone auth service: key loading, ES256 token
//! issuance and verification, and the rotation protocol that renews an
//! expired access token from its paired refresh token.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
