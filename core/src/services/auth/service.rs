//! Main authentication service implementation

use std::sync::Arc;

use crate::domain::entities::{NewUser, TokenPair, User};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::UserRepository;
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;

/// Authenticated user together with the pair issued at login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub tokens: TokenPair,
}

/// Authentication service for registration and password login
#[derive(Clone)]
pub struct AuthService {
    /// User repository for database operations
    users: Arc<dyn UserRepository>,
    /// Token service for JWT management
    tokens: TokenService,
    /// Service configuration
    config: AuthServiceConfig,
}

impl AuthService {
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `users` - Repository for user data persistence
    /// * `tokens` - Service issuing the token pair at login
    /// * `config` - Service configuration
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenService, config: AuthServiceConfig) -> Self {
        Self {
            users,
            tokens,
            config,
        }
    }

    /// Register a user with email and password
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The stored user
    /// * `Err(DomainError::Validation)` - Password too short or registration closed
    /// * `Err(DomainError::Auth(AuthError::UserAlreadyExists))` - Email taken
    pub async fn register(&self, email: &str, password: &str) -> DomainResult<User> {
        if !self.config.allow_registration {
            return Err(DomainError::Validation {
                message: "Registration is disabled".to_string(),
            });
        }
        if password.chars().count() < self.config.min_password_length {
            return Err(DomainError::Validation {
                message: format!(
                    "Password must be at least {} characters",
                    self.config.min_password_length
                ),
            });
        }

        let hash = self.hash_password(password).await?;
        let user = self.users.create(NewUser::new(email, hash)).await?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check credentials and issue a token pair
    ///
    /// Unknown email and wrong password both yield
    /// `AuthError::InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<LoginOutcome> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                tracing::info!("Login attempt for unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !self.verify_password(password, &user.password_hash).await? {
            tracing::info!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let tokens = self.tokens.issue_pair(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginOutcome { user, tokens })
    }

    async fn hash_password(&self, password: &str) -> DomainResult<String> {
        let password = password.to_owned();
        let cost = self.config.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Hashing task failed: {}", e),
            })?;

        hashed.map_err(|e| {
            tracing::error!(error = %e, "Failed to hash password");
            AuthError::HashingFailed.into()
        })
    }

    async fn verify_password(&self, password: &str, hash: &str) -> DomainResult<bool> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Hashing task failed: {}", e),
            })?;

        verified.map_err(|e| {
            tracing::error!(error = %e, "Stored password hash is unreadable");
            AuthError::HashingFailed.into()
        })
    }
}
