//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - ES256 key loading with one-time memoization
//! - Access and refresh token issuance
//! - Signature verification and claim classification

mod config;
mod key_manager;
mod service;
mod verification;

#[cfg(test)]
pub(crate) mod tests;

pub use config::TokenServiceConfig;
pub use key_manager::{FileKeySource, KeyProvider, KeySource, PemKeySource};
pub use service::TokenService;
pub use verification::Verification;
