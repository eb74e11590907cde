//! Request authorization with transparent access token rotation
//!
//! An access token whose only defect is expiry is exchanged for a fresh
//! access and refresh pair, provided the paired refresh token is valid for
//! the same issuer and subject and the user still exists.

mod service;


pub use service::{Authorization, AuthorizationService};
