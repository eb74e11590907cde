use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::app::AppState;
use crate::dto::auth::{RegisterRequest, RegisterResponse};
use crate::handlers::ApiError;
use crate::middleware::RequestId;

/// Handler for POST /api/v1/auth/register
///
/// # Request Body
///
/// ```json
/// {
///     "email": "user@example.com",
///     "password": "at least 8 characters"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Invalid email or password too short
/// - 409 Conflict: Email already registered
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
    request_id: RequestId,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let user = state
        .auth_service
        .register(&request.email, &request.password)
        .await?;

    log::info!("[{}] Registered user {}", request_id, user.id);

    Ok(HttpResponse::Created().json(RegisterResponse {
        user_id: user.id.value(),
        email: user.email,
        created_at: user.created_at,
    }))
}
