//! Authentication service module
//!
//! Password based registration and login. A successful login issues the
//! same access and refresh pair the rotation protocol later renews.

mod config;
mod service;


pub use config::AuthServiceConfig;
pub use service::{AuthService, LoginOutcome};
