//! Conversion of domain failures into HTTP responses
//!
//! Every body uses the shared [`ErrorResponse`] envelope with a fixed
//! message per error code. Underlying library and database error text is
//! logged here and never returned.

use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use ks_core::errors::{AuthError, DomainError, TokenError};
use ks_shared::{error_codes, ErrorResponse};

/// Error returned by handlers and the authorization middleware
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Request body failed validation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        Self::Domain(error.into())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort_unstable();
        Self::InvalidRequest(format!("invalid fields: {}", fields.join(", ")))
    }
}

impl ApiError {
    /// Error code and client-facing message
    fn describe(&self) -> (&'static str, String) {
        let fixed = |code: &'static str, message: &str| (code, message.to_string());

        match self {
            Self::InvalidRequest(message) => (error_codes::VALIDATION_ERROR, message.clone()),
            Self::Domain(error) => match error {
                DomainError::Validation { message } => {
                    (error_codes::VALIDATION_ERROR, message.clone())
                }
                DomainError::Token(token) => match token {
                    TokenError::Missing => {
                        fixed(error_codes::TOKEN_MISSING, "Authentication token is missing")
                    }
                    TokenError::Malformed => {
                        fixed(error_codes::TOKEN_MALFORMED, "Authentication token is malformed")
                    }
                    TokenError::InvalidScope => fixed(
                        error_codes::TOKEN_INVALID_SCOPE,
                        "Token is not valid for this purpose",
                    ),
                    TokenError::Expired => fixed(error_codes::TOKEN_EXPIRED, "Token has expired"),
                    TokenError::Invalid { .. } => {
                        fixed(error_codes::TOKEN_INVALID, "Authentication token is invalid")
                    }
                    TokenError::SigningFailed => {
                        fixed(error_codes::INTERNAL_ERROR, "An internal error occurred")
                    }
                },
                DomainError::Auth(auth) => match auth {
                    AuthError::UserNotFound => fixed(error_codes::USER_NOT_FOUND, "User not found"),
                    AuthError::InvalidCredentials => {
                        fixed(error_codes::INVALID_CREDENTIALS, "Invalid email or password")
                    }
                    AuthError::UserAlreadyExists => fixed(error_codes::CONFLICT, "User already exists"),
                    AuthError::HashingFailed => {
                        fixed(error_codes::INTERNAL_ERROR, "An internal error occurred")
                    }
                },
                DomainError::Storage(_) => {
                    fixed(error_codes::DATABASE_ERROR, "The user store is unavailable")
                }
                DomainError::Key(_) | DomainError::Internal { .. } => {
                    fixed(error_codes::INTERNAL_ERROR, "An internal error occurred")
                }
            },
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Domain(error) => match error {
                DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
                DomainError::Token(TokenError::SigningFailed) => StatusCode::INTERNAL_SERVER_ERROR,
                DomainError::Token(_) => StatusCode::UNAUTHORIZED,
                DomainError::Auth(AuthError::UserAlreadyExists) => StatusCode::CONFLICT,
                DomainError::Auth(AuthError::HashingFailed) => StatusCode::INTERNAL_SERVER_ERROR,
                DomainError::Auth(_) => StatusCode::UNAUTHORIZED,
                DomainError::Storage(_) | DomainError::Key(_) | DomainError::Internal { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let (code, message) = self.describe();

        if status.is_server_error() {
            log::error!("Request failed: {:?}", self);
        } else {
            log::info!("Request rejected ({}): {}", code, self);
        }

        let mut response = HttpResponse::build(status);
        if status == StatusCode::UNAUTHORIZED {
            response.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        response.json(ErrorResponse::new(code, message))
    }
}
