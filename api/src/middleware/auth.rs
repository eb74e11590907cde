//! Token authentication middleware for protecting API endpoints.
//!
//! Extracts the access token from the `Authorization` header and hands it,
//! together with the refresh cookie, to the [`AuthorizationService`]. An
//! access token whose only defect is expiry is rotated transparently: the
//! replacement pair is attached to the downstream response.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use ks_core::{
    domain::entities::{Claims, TokenPair, TokenScope, UserId},
    errors::TokenError,
    services::AuthorizationService,
};
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use crate::handlers::ApiError;
use crate::middleware::request_id::RequestIdExt;
use crate::transport;

/// Identity established by the middleware, stored as a request extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Verified user identifier
    pub user_id: UserId,
    /// Claims of the access token in effect for this request
    pub claims: Claims,
    /// Whether the token pair was rotated while serving this request
    pub rotated: bool,
}

impl AuthContext {
    pub fn new(claims: Claims, rotated: bool) -> Result<Self, TokenError> {
        let user_id = claims.user_id().ok_or(TokenError::Malformed)?;
        Ok(Self {
            user_id,
            claims,
            rotated,
        })
    }

    pub fn role(&self) -> Option<&str> {
        self.claims.role.as_deref()
    }

    pub fn scope(&self) -> TokenScope {
        self.claims.scp
    }
}

/// Token authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    authorization: AuthorizationService,
    refresh_cookie: Rc<str>,
}

impl JwtAuth {
    /// Creates the middleware
    ///
    /// # Arguments
    /// * `authorization` - Verifies access tokens and performs rotation
    /// * `refresh_cookie` - Name of the cookie carrying the refresh token
    pub fn new(authorization: AuthorizationService, refresh_cookie: impl AsRef<str>) -> Self {
        Self {
            authorization,
            refresh_cookie: Rc::from(refresh_cookie.as_ref()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            authorization: self.authorization.clone(),
            refresh_cookie: Rc::clone(&self.refresh_cookie),
        }))
    }
}

/// Token authentication middleware service
///
/// Rejections are answered directly with the error response; the wrapped
/// service is never called for them.
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    authorization: AuthorizationService,
    refresh_cookie: Rc<str>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let authorization = self.authorization.clone();
        let refresh_cookie = Rc::clone(&self.refresh_cookie);

        Box::pin(async move {
            let request_id = req.request_id();
            let (context, rotated) = match authorize(&req, &authorization, &refresh_cookie).await {
                Ok(authorized) => authorized,
                Err(error) => {
                    log::info!(
                        "[{}] Rejected {} {}: {}",
                        request_id,
                        req.method(),
                        req.path(),
                        error
                    );
                    let response = error.error_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            if context.rotated {
                log::info!("[{}] Rotated token pair for user {}", request_id, context.user_id);
            } else {
                log::debug!("[{}] Authorized user {}", request_id, context.user_id);
            }
            req.extensions_mut().insert(context);

            let mut res = service.call(req).await?;

            if let Some(pair) = rotated {
                let attached = transport::attach_access_token(res.response_mut(), &pair.access.token)
                    .and_then(|_| {
                        transport::attach_refresh_token(
                            res.response_mut(),
                            &refresh_cookie,
                            &pair.refresh.token,
                            pair.refresh.expires_at,
                        )
                    });

                if let Err(error) = attached {
                    log::error!("[{}] Failed to attach rotated tokens: {}", request_id, error);
                    let (req, _) = res.into_parts();
                    let response = error.error_response();
                    return Ok(ServiceResponse::new(req, response).map_into_right_body());
                }
            }

            Ok(res.map_into_left_body())
        })
    }
}

/// Runs the rotation protocol for one request
async fn authorize(
    req: &ServiceRequest,
    authorization: &AuthorizationService,
    refresh_cookie: &str,
) -> Result<(AuthContext, Option<TokenPair>), ApiError> {
    let access_token = transport::extract_access_token(req.request())?;
    let refresh_token = transport::extract_refresh_token(req.request(), refresh_cookie).ok();

    let outcome = authorization
        .authorize(&access_token, refresh_token.as_deref())
        .await?;

    let context = AuthContext::new(outcome.claims, outcome.rotated.is_some())?;
    Ok((context, outcome.rotated))
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result: Result<Self, Self::Error> = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::from(TokenError::Missing).into());

        ready(result)
    }
}

/// Extractor for optional authentication
pub struct OptionalAuth(pub Option<AuthContext>);

impl FromRequest for OptionalAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let auth = req.extensions().get::<AuthContext>().cloned();
        ready(Ok(OptionalAuth(auth)))
    }
}
