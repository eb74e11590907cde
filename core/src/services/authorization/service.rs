//! Rotation protocol implementation

use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{Claims, TokenPair, TokenScope, User, UserId};
use crate::errors::{AuthError, DomainResult, InvalidReason, StorageError, TokenError};
use crate::repositories::UserRepository;
use crate::services::token::{TokenService, Verification};

/// Identity established for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    /// Claims of the presented access token, or of its replacement
    pub claims: Claims,
    /// Replacement pair the transport must hand back to the client
    pub rotated: Option<TokenPair>,
}

impl Authorization {
    pub fn was_rotated(&self) -> bool {
        self.rotated.is_some()
    }
}

/// Verifies access tokens and rotates them when they have merely expired
#[derive(Clone)]
pub struct AuthorizationService {
    tokens: TokenService,
    users: Arc<dyn UserRepository>,
    store_timeout: Duration,
}

impl AuthorizationService {
    /// Creates the service
    ///
    /// # Arguments
    ///
    /// * `tokens` - Codec used for verification and reissue
    /// * `users` - User store consulted during rotation
    /// * `store_timeout` - Upper bound for a single user lookup
    pub fn new(tokens: TokenService, users: Arc<dyn UserRepository>, store_timeout: Duration) -> Self {
        Self {
            tokens,
            users,
            store_timeout,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn users(&self) -> &Arc<dyn UserRepository> {
        &self.users
    }

    /// Authorizes a request from its access token and optional refresh token
    ///
    /// # Returns
    ///
    /// * `Ok(Authorization)` - Claims to attach to the request, plus a new pair if rotated
    /// * `Err(DomainError::Token(_))` - Token missing, invalid, or not rotatable
    /// * `Err(DomainError::Auth(AuthError::UserNotFound))` - Subject no longer exists
    /// * `Err(DomainError::Storage(_))` - Lookup failed or timed out
    /// * `Err(DomainError::Key(_))` - Keys unavailable
    pub async fn authorize(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> DomainResult<Authorization> {
        let policy = self.tokens.config().policy();

        match self.tokens.verify(access_token, TokenScope::Access, &policy)? {
            Verification::Valid(claims) => Ok(Authorization {
                claims,
                rotated: None,
            }),
            Verification::ExpiredOnly(claims) => self.rotate(claims, refresh_token).await,
            Verification::Invalid(reason) => {
                tracing::info!(%reason, "Access token rejected");
                Err(TokenError::from(reason).into())
            }
        }
    }

    async fn rotate(&self, expired: Claims, refresh_token: Option<&str>) -> DomainResult<Authorization> {
        let user_id = expired.user_id().ok_or(TokenError::Invalid {
            reason: InvalidReason::InvalidSubject,
        })?;

        let user = self.find_user(user_id).await?;

        let refresh_token = refresh_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                tracing::info!(user_id = %user_id, "Access token expired without refresh token");
                TokenError::Missing
            })?;

        // The refresh token must belong to the same principal as the expired
        // access token.
        let pinned = self
            .tokens
            .config()
            .policy()
            .with_issuer(expired.iss.clone())
            .with_subject(expired.sub.clone());

        match self.tokens.verify(refresh_token, TokenScope::Refresh, &pinned)? {
            Verification::Valid(_) => {}
            Verification::ExpiredOnly(_) => {
                tracing::info!(user_id = %user_id, "Refresh token expired");
                return Err(TokenError::Expired.into());
            }
            Verification::Invalid(reason) => {
                tracing::warn!(user_id = %user_id, %reason, "Refresh token rejected during rotation");
                return Err(TokenError::from(reason).into());
            }
        }

        let pair = self.tokens.issue_pair(&user)?;
        tracing::info!(user_id = %user_id, "Rotated token pair");

        Ok(Authorization {
            claims: pair.access.claims.clone(),
            rotated: Some(pair),
        })
    }

    async fn find_user(&self, id: UserId) -> DomainResult<User> {
        let lookup = tokio::time::timeout(self.store_timeout, self.users.find_by_id(id)).await;

        match lookup {
            Ok(Ok(Some(user))) => Ok(user),
            Ok(Ok(None)) => {
                tracing::info!(user_id = %id, "Rotation requested for unknown user");
                Err(AuthError::UserNotFound.into())
            }
            Ok(Err(e)) => {
                tracing::error!(user_id = %id, error = ?e, "User lookup failed during rotation");
                Err(e)
            }
            Err(_) => {
                let after_ms = self.store_timeout.as_millis().min(u64::MAX as u128) as u64;
                tracing::error!(user_id = %id, after_ms, "User lookup timed out during rotation");
                Err(StorageError::Timeout { after_ms }.into())
            }
        }
    }
}
