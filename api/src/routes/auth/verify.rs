use actix_web::HttpResponse;

use crate::dto::auth::VerifyResponse;
use crate::middleware::auth::AuthContext;

/// Handler for GET /api/v1/auth/verify
///
/// Returns the identity carried by a valid access token.
pub async fn verify(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(VerifyResponse {
        user_id: auth.user_id,
        username: auth.username,
        email: auth.email,
        expires_at: auth.expires_at,
    })
}
