use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

use sso_api::middleware::RateLimitGate;
use sso_api::{create_app, AppState};
use sso_core::{
    IdentityProvider, LimitPolicy, RequestGate, RevocationLedger, RevocationRepository,
    SessionService, SlidingWindowLimiter, TokenManager, WindowRepository,
};
use sso_shared::{utils::logging, AppConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    logging::init(&config.logging).context("failed to initialise logging")?;

    info!(environment = %config.environment, "Starting SSO API server");

    let tokens = Arc::new(
        TokenManager::from_config(&config.jwt).context("failed to load signing keys")?,
    );
    let validator = Arc::new(tokens.validator());

    let stores = sso_infra::initialize(&config.cache)
        .await
        .context("failed to connect to Redis")?;

    let revocations: Arc<dyn RevocationRepository> = stores.revocations.clone();
    let identities: Arc<dyn IdentityProvider> = stores.identities.clone();
    let sessions = SessionService::new(tokens, RevocationLedger::new(revocations), identities);

    let rate_limit = if config.rate_limit.enabled {
        let policy = Arc::new(
            LimitPolicy::from_config(&config.rate_limit).context("invalid rate limit policy")?,
        );
        let windows: Arc<dyn WindowRepository> = stores.windows.clone();
        let gate = RequestGate::new(
            SlidingWindowLimiter::new(windows),
            policy,
            config.rate_limit.fail_mode,
            config.rate_limit.trust_proxy,
        );
        RateLimitGate::new(Arc::new(gate))
    } else {
        warn!("rate limiting is disabled");
        RateLimitGate::disabled()
    };

    let state = web::Data::new(AppState {
        sessions,
        validator,
        redis: Some(stores.client.clone()),
        login_secret: config.jwt.login_secret.clone(),
    });

    if config.jwt.login_secret.is_none() {
        warn!("SSO_LOGIN_SECRET is not set, the login route is closed");
    }

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || {
        create_app(state.clone(), rate_limit.clone()).wrap(TracingLogger::default())
    });
    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server.bind(&bind_address)?.run().await?;
    Ok(())
}
