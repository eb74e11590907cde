//! Authentication route handlers
//!
//! - Registration with email and password
//! - Password login issuing the token pair
//! - Identity of the authenticated caller

pub mod authn;
pub mod login;
pub mod register;
