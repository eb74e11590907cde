pub mod auth;

pub use auth::*;
pub use ks_shared::ErrorResponse;
pub use ks_core::domain::value_objects::AuthResponse as LoginResponse;
