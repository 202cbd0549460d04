use actix_web::{web, HttpResponse};
use tracing::warn;

use crate::app::AppState;
use crate::dto::auth::{LogoutRequest, LogoutResponse};
use crate::handlers::ApiError;
use crate::middleware::auth::AuthContext;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the caller's refresh token for the rest of its lifetime.
/// Requires a valid access token, and the refresh token must belong to
/// the same user.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "eyJ..."
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: missing or invalid tokens
/// - 503 Service Unavailable: revocation store unreachable
pub async fn logout(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: web::Json<LogoutRequest>,
) -> Result<HttpResponse, ApiError> {
    let claims = state
        .sessions
        .tokens()
        .parse_refresh(&request.refresh_token)
        .map_err(sso_core::DomainError::from)?;

    if claims.user_id != auth.user_id {
        warn!(
            user_id = auth.user_id,
            token_user_id = claims.user_id,
            "logout with another user's refresh token"
        );
        return Err(ApiError::unauthorized());
    }

    state.sessions.logout(&request.refresh_token).await?;

    Ok(HttpResponse::Ok().json(LogoutResponse {
        message: "Logged out successfully".to_string(),
    }))
}
