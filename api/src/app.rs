//! Application state and factory
//!
//! The stores are held as trait objects so the same application can run on
//! Redis in production and on the in-memory repositories in tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::StatusCode,
    web, App, HttpResponse, ResponseError,
};

use sso_core::{
    IdentityProvider, RequestGate, RevocationRepository, SessionService, TokenValidator,
    WindowRepository,
};
use sso_infra::RedisClient;
use sso_shared::{HealthResponse, HealthStatus, ServiceHealth};

use crate::handlers::{json_error_handler, ApiError};
use crate::middleware::{JwtAuth, RateLimitGate};
use crate::routes::auth::{login, logout, refresh, verify};

/// Request gate over any window store
pub type SharedGate = RequestGate<Arc<dyn WindowRepository>>;

/// Session service over any revocation store and identity source
pub type SharedSessions = SessionService<Arc<dyn RevocationRepository>, Arc<dyn IdentityProvider>>;

/// State shared by every handler
pub struct AppState {
    pub sessions: SharedSessions,
    pub validator: Arc<TokenValidator>,
    /// Probed by `/health`; `None` when running on in-memory stores
    pub redis: Option<Arc<RedisClient>>,
    /// Secret the upstream login service presents; `None` closes `/login`
    pub login_secret: Option<String>,
}

/// Create and configure the application with all dependencies
pub fn create_app(
    state: web::Data<AppState>,
    rate_limit: RateLimitGate,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let auth = JwtAuth::new(state.validator.clone());

    App::new()
        .app_data(state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(rate_limit)
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/login", web::post().to(login::login))
                    .route("/refresh", web::post().to(refresh::refresh))
                    .route("/logout", web::post().to(logout::logout).wrap(auth.clone()))
                    .route("/verify", web::get().to(verify::verify).wrap(auth)),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let mut services = HashMap::new();

    let store = match &state.redis {
        Some(client) => {
            let started = Instant::now();
            let result = client.health_check().await;
            let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            match result {
                Ok(true) => ServiceHealth {
                    status: HealthStatus::Healthy,
                    message: None,
                    response_time_ms: Some(elapsed),
                },
                Ok(false) => ServiceHealth {
                    status: HealthStatus::Degraded,
                    message: Some("unexpected PING reply".to_string()),
                    response_time_ms: Some(elapsed),
                },
                Err(e) => ServiceHealth {
                    status: HealthStatus::Unhealthy,
                    message: Some(e.to_string()),
                    response_time_ms: None,
                },
            }
        }
        None => ServiceHealth {
            status: HealthStatus::Healthy,
            message: Some("in-memory stores".to_string()),
            response_time_ms: None,
        },
    };
    services.insert("redis".to_string(), store);

    let response = HealthResponse::from_services(services, env!("CARGO_PKG_VERSION"));
    let status = match response.status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
    };
    HttpResponse::build(status).json(response)
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    ApiError::not_found().error_response()
}
