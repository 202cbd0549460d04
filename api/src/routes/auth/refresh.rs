use actix_web::{web, HttpResponse};

use crate::app::AppState;
use crate::dto::auth::{RefreshTokenRequest, TokenResponse};
use crate::handlers::ApiError;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new token pair. The presented refresh
/// token is revoked, so it can be used exactly once.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "eyJ..."
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "eyJ...",
///     "token_type": "Bearer",
///     "expires_in": 900,
///     "refresh_expires_in": 1296000
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: invalid, expired, revoked or already used refresh token
/// - 503 Service Unavailable: revocation store unreachable
pub async fn refresh(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, ApiError> {
    let pair = state.sessions.refresh(&request.refresh_token).await?;
    Ok(HttpResponse::Ok().json(TokenResponse::from(pair)))
}
