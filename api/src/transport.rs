//! Credential transport
//!
//! The access token travels in the `Authorization: Bearer` header in both
//! directions. The refresh token travels in an HTTP-only cookie.

use actix_web::{
    cookie::{time::OffsetDateTime, Cookie, SameSite},
    http::header::{HeaderValue, AUTHORIZATION},
    HttpRequest, HttpResponse,
};
use chrono::{DateTime, Utc};
use ks_core::errors::{DomainError, TokenError};

use crate::handlers::ApiError;

const BEARER_PREFIX: &str = "Bearer ";

/// Reads the access token from the `Authorization` header
///
/// A missing header is `TokenError::Missing`. A header that is present but
/// lacks the exact `Bearer ` prefix, has an empty remainder, or contains
/// anything other than visible ASCII is `TokenError::Malformed`.
pub fn extract_access_token(req: &HttpRequest) -> Result<String, TokenError> {
    let value = req.headers().get(AUTHORIZATION).ok_or(TokenError::Missing)?;
    let value = value.to_str().map_err(|_| TokenError::Malformed)?;

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(TokenError::Malformed)?;

    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(TokenError::Malformed);
    }

    Ok(token.to_string())
}

/// Sets the `Authorization` header of a response, replacing any previous one
pub fn attach_access_token<B>(res: &mut HttpResponse<B>, token: &str) -> Result<(), ApiError> {
    let value = HeaderValue::from_str(&format!("{}{}", BEARER_PREFIX, token)).map_err(|_| {
        ApiError::Domain(DomainError::Internal {
            message: "issued token is not a valid header value".to_string(),
        })
    })?;
    res.headers_mut().insert(AUTHORIZATION, value);
    Ok(())
}

/// Reads the refresh token from the cookie named `cookie_name`
///
/// An empty or whitespace-only value counts as missing.
pub fn extract_refresh_token(req: &HttpRequest, cookie_name: &str) -> Result<String, TokenError> {
    req.cookie(cookie_name)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(TokenError::Missing)
}

/// Builds the refresh cookie, expiring together with the token it carries
pub fn refresh_cookie(cookie_name: &str, token: &str, expires_at: DateTime<Utc>) -> Cookie<'static> {
    let mut cookie = Cookie::build(cookie_name.to_string(), token.to_string())
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .finish();

    if let Ok(expires) = OffsetDateTime::from_unix_timestamp(expires_at.timestamp()) {
        cookie.set_expires(expires);
    }
    cookie
}

/// Adds the refresh cookie to a response
pub fn attach_refresh_token<B>(
    res: &mut HttpResponse<B>,
    cookie_name: &str,
    token: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), ApiError> {
    res.add_cookie(&refresh_cookie(cookie_name, token, expires_at))
        .map_err(|_| {
            ApiError::Domain(DomainError::Internal {
                message: "refresh cookie could not be encoded".to_string(),
            })
        })
}
