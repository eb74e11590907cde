//! Main token service implementation

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, Header, Validation};
use serde::Deserialize;

use crate::domain::entities::token::timestamp_to_datetime;
use crate::domain::entities::{Claims, IssuedToken, TokenPair, TokenScope, User, UserId};
use crate::domain::value_objects::ValidationPolicy;
use crate::errors::{DomainError, DomainResult, InvalidReason, TokenError};

use super::config::TokenServiceConfig;
use super::key_manager::KeyProvider;
use super::verification::Verification;

const ALGORITHM: Algorithm = Algorithm::ES256;

/// Service for issuing and verifying ES256 signed tokens
///
/// Stateless apart from the keys it reads through the shared
/// [`KeyProvider`], so one instance serves every request.
#[derive(Debug, Clone)]
pub struct TokenService {
    keys: Arc<KeyProvider>,
    config: TokenServiceConfig,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `keys` - Provider of the signing keypair
    /// * `config` - Issuer, audience, lifetimes and leeway
    pub fn new(keys: Arc<KeyProvider>, config: TokenServiceConfig) -> Self {
        // jsonwebtoken only checks the signature; claim policy is applied
        // afterwards so that expiry can be classified separately.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self {
            keys,
            config,
            validation,
        }
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    pub fn keys(&self) -> &Arc<KeyProvider> {
        &self.keys
    }

    /// Signs a token for `user_id` valid for `ttl` from now
    ///
    /// `ttl` may be zero or negative, producing an already expired token.
    pub fn issue(
        &self,
        user_id: UserId,
        role: Option<String>,
        scope: TokenScope,
        ttl: Duration,
    ) -> DomainResult<IssuedToken> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iss: self.config.issuer.clone(),
            iat: now,
            exp: now.saturating_add(ttl.num_seconds()),
            scp: scope,
            role,
            aud: self.config.audience.clone(),
        };
        let token = self.encode_jwt(&claims)?;

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
            claims,
        })
    }

    /// Signs a token for a user with the configured lifetime of `scope`
    pub fn issue_for(&self, user: &User, scope: TokenScope) -> DomainResult<IssuedToken> {
        self.issue(user.id, user.role.clone(), scope, self.config.ttl(scope))
    }

    /// Issues a fresh access and refresh token for a user
    pub fn issue_pair(&self, user: &User) -> DomainResult<TokenPair> {
        let refresh = self.issue_for(user, TokenScope::Refresh)?;
        let access = self.issue_for(user, TokenScope::Access)?;
        Ok(TokenPair { access, refresh })
    }

    fn encode_jwt(&self, claims: &Claims) -> DomainResult<String> {
        let key = self.keys.private_key()?;
        encode(&Header::new(ALGORITHM), claims, key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            DomainError::Token(TokenError::SigningFailed)
        })
    }

    /// Verifies a token against the current wall clock
    ///
    /// # Returns
    ///
    /// * `Ok(Verification)` - Classified outcome
    /// * `Err(DomainError::Key)` - The public key could not be loaded
    pub fn verify(
        &self,
        token: &str,
        expected_scope: TokenScope,
        policy: &ValidationPolicy,
    ) -> DomainResult<Verification> {
        self.verify_at(token, expected_scope, policy, Utc::now().timestamp())
    }

    /// Verifies a token as of the unix timestamp `now`
    pub fn verify_at(
        &self,
        token: &str,
        expected_scope: TokenScope,
        policy: &ValidationPolicy,
        now: i64,
    ) -> DomainResult<Verification> {
        let key = self.keys.public_key()?;

        let claims = match decode::<Claims>(token, key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                let reason = match e.kind() {
                    ErrorKind::InvalidSignature => InvalidReason::BadSignature,
                    ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                        InvalidReason::Algorithm
                    }
                    _ => InvalidReason::Malformed,
                };
                tracing::debug!(error = %e, ?reason, "Token rejected by decoder");
                return Ok(Verification::Invalid(reason));
            }
        };

        Ok(classify(claims, expected_scope, policy, now))
    }

    /// Verifies with the service-wide policy and collapses the outcome
    pub fn verify_claims(&self, token: &str, expected_scope: TokenScope) -> DomainResult<Claims> {
        Ok(self
            .verify(token, expected_scope, &self.config.policy())?
            .into_result()?)
    }

    /// Reads the expiry of a token without checking its signature
    ///
    /// Only for tokens this process has just issued; never for authorization.
    pub fn peek_expiry(&self, token: &str) -> DomainResult<DateTime<Utc>> {
        #[derive(Deserialize)]
        struct Expiry {
            exp: i64,
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<Expiry>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| timestamp_to_datetime(data.claims.exp))
            .map_err(|_| DomainError::Token(TokenError::Malformed))
    }
}

/// Applies structural and policy checks to signature-verified claims
///
/// Expiry is evaluated last so that `ExpiredOnly` means nothing else failed.
fn classify(
    claims: Claims,
    expected_scope: TokenScope,
    policy: &ValidationPolicy,
    now: i64,
) -> Verification {
    if let Err(reason) = check_claims(&claims, expected_scope, policy, now) {
        tracing::debug!(?reason, sub = %claims.sub, "Token claims rejected");
        return Verification::Invalid(reason);
    }

    if claims.is_expired_at(now, policy.leeway_secs()) {
        Verification::ExpiredOnly(claims)
    } else {
        Verification::Valid(claims)
    }
}

fn check_claims(
    claims: &Claims,
    expected_scope: TokenScope,
    policy: &ValidationPolicy,
    now: i64,
) -> Result<(), InvalidReason> {
    if claims.iss.is_empty() || claims.iat == 0 || claims.exp == 0 {
        return Err(InvalidReason::MissingClaim);
    }
    if claims.user_id().is_none() {
        return Err(InvalidReason::InvalidSubject);
    }
    if claims.scp != expected_scope {
        return Err(InvalidReason::ScopeMismatch);
    }
    if let Some(issuer) = &policy.issuer {
        if &claims.iss != issuer {
            return Err(InvalidReason::IssuerMismatch);
        }
    }
    if let Some(subject) = &policy.subject {
        if &claims.sub != subject {
            return Err(InvalidReason::SubjectMismatch);
        }
    }
    if let Some(audience) = &policy.audience {
        if claims.aud.as_ref() != Some(audience) {
            return Err(InvalidReason::AudienceMismatch);
        }
    }
    if policy.require_issued_at {
        let latest = now.saturating_add(policy.leeway_secs() as i64);
        if claims.iat > latest {
            return Err(InvalidReason::IssuedInFuture);
        }
    }
    Ok(())
}
