//! Business services containing domain logic and use cases.

pub mod auth;
pub mod authorization;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig, LoginOutcome};
pub use authorization::{Authorization, AuthorizationService};
pub use token::{
    FileKeySource, KeyProvider, KeySource, PemKeySource, TokenService, TokenServiceConfig,
    Verification,
};
