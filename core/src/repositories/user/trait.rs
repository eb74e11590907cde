//! User repository trait defining the interface for user data persistence.
//!
//! The token lifecycle only needs to resolve users by identifier during
//! rotation; registration and login add lookups by email and inserts.

use async_trait::async_trait;

use crate::domain::entities::user::{NewUser, User, UserId};
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// Implementations map driver failures to `DomainError::Storage` and never
/// put raw driver text into the error's `Display`.
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use ks_core::repositories::UserRepository;
/// use ks_core::domain::entities::{NewUser, User, UserId};
/// use ks_core::errors::DomainError;
///
/// struct InMemoryUsers;
///
/// #[async_trait]
/// impl UserRepository for InMemoryUsers {
///     async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
///
///     async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
///
///     async fn create(&self, user: NewUser) -> Result<User, DomainError> {
///         Ok(User::new(UserId(1), user.email, user.password_hash))
///     }
///
///     async fn ping(&self) -> Result<(), DomainError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with this identifier
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by email (compared lowercase)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Insert a new user and return it with its assigned identifier
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError::Auth(AuthError::UserAlreadyExists))` - Email taken
    /// * `Err(DomainError)` - Storage failure
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<(), DomainError>;
}
