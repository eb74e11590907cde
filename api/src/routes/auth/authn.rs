use actix_web::HttpResponse;

use crate::dto::auth::AuthnResponse;
use crate::middleware::auth::AuthContext;

/// Handler for GET /api/v1/auth/authn
///
/// Requires authentication. Echoes the identity the middleware established,
/// which after a rotation is that of the freshly issued access token.
pub async fn authn(auth: AuthContext) -> HttpResponse {
    let claims = &auth.claims;

    HttpResponse::Ok().json(AuthnResponse {
        subject: claims.sub.clone(),
        issuer: claims.iss.clone(),
        scope: auth.scope().to_string(),
        role: auth.role().map(str::to_string),
        issued_at: claims.issued_at(),
        expires_at: claims.expires_at(),
        rotated: auth.rotated,
    })
}
