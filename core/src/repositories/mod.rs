//! Repository interfaces for persistence, plus in-memory doubles.

pub mod user;

pub use user::{MockUserRepository, UserRepository};
