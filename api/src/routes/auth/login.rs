use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::app::AppState;
use crate::dto::auth::LoginRequest;
use crate::dto::LoginResponse;
use crate::handlers::ApiError;
use crate::middleware::RequestId;
use crate::transport;

/// Handler for POST /api/v1/auth/login
///
/// On success the access token is returned in the `Authorization` header and
/// the refresh token in the refresh cookie. The body only carries expiries.
///
/// ## Errors
/// - 400 Bad Request: Malformed body
/// - 401 Unauthorized: Unknown email or wrong password
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
    request_id: RequestId,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let outcome = state
        .auth_service
        .login(&request.email, &request.password)
        .await
        .map_err(|e| {
            if e.is_authentication_failure() {
                log::info!("[{}] Login rejected: {}", request_id, e);
            }
            e
        })?;
    log::info!("[{}] User {} logged in", request_id, outcome.user.id);
    let tokens = &outcome.tokens;

    let mut response = HttpResponse::Ok().json(LoginResponse::new(outcome.user.id, tokens));
    transport::attach_access_token(&mut response, &tokens.access.token)?;
    transport::attach_refresh_token(
        &mut response,
        &state.refresh_cookie_name,
        &tokens.refresh.token,
        tokens.refresh.expires_at,
    )?;

    Ok(response)
}
