use actix_web::{web, HttpRequest, HttpResponse};
use tracing::warn;

use sso_core::TokenIdentity;

use crate::app::AppState;
use crate::dto::auth::{LoginRequest, TokenResponse};
use crate::handlers::ApiError;

/// Header carrying the upstream login service's shared secret
pub const LOGIN_SECRET_HEADER: &str = "x-login-secret";

/// Handler for POST /api/v1/auth/login
///
/// Opens a session for an identity whose credentials were already checked
/// by the upstream login service. The caller proves it is that service with
/// the shared secret; end users never reach this route directly.
///
/// # Headers
///
/// ```text
/// X-Login-Secret: {shared secret}
/// ```
///
/// # Request Body
///
/// ```json
/// {
///     "user_id": 42,
///     "username": "alice",
///     "email": "alice@example.com"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: incomplete identity
/// - 401 Unauthorized: missing or wrong secret
/// - 404 Not Found: no login secret configured
/// - 503 Service Unavailable: identity store unreachable
pub async fn login(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let Some(expected) = state.login_secret.as_deref() else {
        return Err(ApiError::not_found());
    };

    let presented = req
        .headers()
        .get(LOGIN_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !secrets_match(presented, expected) {
        warn!("login attempted without a valid upstream secret");
        return Err(ApiError::unauthorized());
    }

    let request = request.into_inner();
    let identity = TokenIdentity::new(request.user_id, request.username, request.email);
    let pair = state.sessions.login(&identity).await?;

    Ok(HttpResponse::Ok().json(TokenResponse::from(pair)))
}

/// Comparison whose running time depends only on the lengths
fn secrets_match(presented: &str, expected: &str) -> bool {
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
