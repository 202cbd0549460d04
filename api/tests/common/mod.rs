//! Shared fixtures for the HTTP tests: in-memory stores and fixed RSA keys.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use async_trait::async_trait;

use sso_api::middleware::RateLimitGate;
use sso_api::AppState;
use sso_core::{
    DomainError, DomainResult, IdentityProvider, InMemoryIdentityProvider, Limit, LimitPolicy,
    MemoryRevocationRepository, MemoryWindowRepository, RequestGate, RevocationLedger,
    RevocationRepository, Rs256KeyManager, SessionService, SlidingWindowLimiter, TokenIdentity,
    TokenManager, TokenManagerConfig, WindowRepository,
};
use sso_shared::FailMode;

pub const TEST_PRIVATE_KEY: &str = include_str!("../../../core/keys/test_private_key.pem");
pub const TEST_PUBLIC_KEY: &str = include_str!("../../../core/keys/test_public_key.pem");

pub const LOGIN_SECRET: &str = "upstream-login-service-shared-secret";

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub tokens: Arc<TokenManager>,
    pub revocations: Arc<MemoryRevocationRepository>,
}

pub fn test_context() -> TestContext {
    test_context_with_login_secret(Some(LOGIN_SECRET))
}

pub fn test_context_with_login_secret(login_secret: Option<&str>) -> TestContext {
    let keys = Rs256KeyManager::from_pem_strings(TEST_PRIVATE_KEY, TEST_PUBLIC_KEY).unwrap();
    let tokens = Arc::new(TokenManager::new(keys, TokenManagerConfig::default()));
    let validator = Arc::new(tokens.validator());

    let revocations = Arc::new(MemoryRevocationRepository::new());
    let ledger_store: Arc<dyn RevocationRepository> = revocations.clone();
    let identities: Arc<dyn IdentityProvider> = Arc::new(InMemoryIdentityProvider::new());

    let sessions = SessionService::new(
        tokens.clone(),
        RevocationLedger::new(ledger_store),
        identities,
    );

    TestContext {
        state: web::Data::new(AppState {
            sessions,
            validator,
            redis: None,
            login_secret: login_secret.map(str::to_string),
        }),
        tokens,
        revocations,
    }
}

pub fn alice() -> TokenIdentity {
    TokenIdentity::new(42, "alice", "alice@example.com")
}

pub fn bob() -> TokenIdentity {
    TokenIdentity::new(7, "bob", "bob@example.com")
}

pub fn peer(ip: &str) -> SocketAddr {
    format!("{}:50000", ip).parse().unwrap()
}

/// Gate over a fresh in-memory window store
pub fn memory_gate(count: u32, window: Duration, trust_proxy: bool) -> RateLimitGate {
    let windows: Arc<dyn WindowRepository> = Arc::new(MemoryWindowRepository::new());
    gate_over(windows, count, window, FailMode::Open, trust_proxy)
}

pub fn gate_over(
    windows: Arc<dyn WindowRepository>,
    count: u32,
    window: Duration,
    fail_mode: FailMode,
    trust_proxy: bool,
) -> RateLimitGate {
    let policy = Arc::new(LimitPolicy::new(Limit::new(count, window).unwrap()));
    let gate = RequestGate::new(
        SlidingWindowLimiter::new(windows),
        policy,
        fail_mode,
        trust_proxy,
    );
    RateLimitGate::new(Arc::new(gate))
}

/// Window store whose backend is always down
pub struct UnreachableWindows;

#[async_trait]
impl WindowRepository for UnreachableWindows {
    async fn try_acquire(&self, _key: &str, _limit: u32, _window: Duration) -> DomainResult<bool> {
        Err(DomainError::StoreUnavailable {
            message: "connection refused".to_string(),
        })
    }
}
