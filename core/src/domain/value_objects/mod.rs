//! Value objects representing immutable domain concepts.

pub mod auth_response;
pub mod validation_policy;

// Re-export commonly used types
pub use auth_response::AuthResponse;
pub use validation_policy::ValidationPolicy;
