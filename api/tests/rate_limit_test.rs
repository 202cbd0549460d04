//! Integration tests for the rate-limit gate middleware

mod common;

use std::sync::Arc;
use std::time::Duration;

use actix_web::{
    http::{header, StatusCode},
    test,
};
use serde_json::Value;

use sso_api::create_app;
use sso_api::middleware::RateLimitGate;
use sso_core::{
    Limit, LimitPolicy, MemoryWindowRepository, RequestGate, SlidingWindowLimiter,
    WindowRepository,
};
use sso_shared::FailMode;

use common::{gate_over, memory_gate, peer, test_context, UnreachableWindows};

#[actix_web::test]
async fn test_requests_over_limit_get_429() {
    let ctx = test_context();
    let gate = memory_gate(2, Duration::from_secs(60), false);
    let app = test::init_service(create_app(ctx.state.clone(), gate)).await;

    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri("/health")
            .peer_addr(peer("192.0.2.1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/health")
        .peer_addr(peer("192.0.2.1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(resp.headers().get(header::RETRY_AFTER).unwrap(), "60");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "RATE_LIMIT_EXCEEDED");
    assert_eq!(body["details"]["limit"], 2);

    // Another client still has its own quota
    let req = test::TestRequest::get()
        .uri("/health")
        .peer_addr(peer("192.0.2.2"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_routes_are_limited_independently() {
    let ctx = test_context();
    let gate = memory_gate(1, Duration::from_secs(60), false);
    let app = test::init_service(create_app(ctx.state.clone(), gate)).await;

    let health = test::TestRequest::get()
        .uri("/health")
        .peer_addr(peer("192.0.2.1"))
        .to_request();
    assert_eq!(test::call_service(&app, health).await.status(), StatusCode::OK);

    let verify = test::TestRequest::get()
        .uri("/api/v1/auth/verify")
        .peer_addr(peer("192.0.2.1"))
        .to_request();
    // Admitted by the gate, rejected by authentication
    assert_eq!(
        test::call_service(&app, verify).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let health_again = test::TestRequest::get()
        .uri("/health")
        .peer_addr(peer("192.0.2.1"))
        .to_request();
    assert_eq!(
        test::call_service(&app, health_again).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[actix_web::test]
async fn test_missing_client_address_is_internal_error() {
    let ctx = test_context();
    let gate = memory_gate(5, Duration::from_secs(60), false);
    let app = test::init_service(create_app(ctx.state.clone(), gate)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn test_forwarded_header_ignored_without_proxy_trust() {
    let ctx = test_context();
    let gate = memory_gate(1, Duration::from_secs(60), false);
    let app = test::init_service(create_app(ctx.state.clone(), gate)).await;

    let first = test::TestRequest::get()
        .uri("/health")
        .peer_addr(peer("10.0.0.1"))
        .insert_header(("X-Forwarded-For", "203.0.113.1"))
        .to_request();
    assert_eq!(test::call_service(&app, first).await.status(), StatusCode::OK);

    // Same proxy peer, different forwarded client: still one bucket
    let second = test::TestRequest::get()
        .uri("/health")
        .peer_addr(peer("10.0.0.1"))
        .insert_header(("X-Forwarded-For", "203.0.113.2"))
        .to_request();
    assert_eq!(
        test::call_service(&app, second).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[actix_web::test]
async fn test_forwarded_header_used_with_proxy_trust() {
    let ctx = test_context();
    let gate = memory_gate(1, Duration::from_secs(60), true);
    let app = test::init_service(create_app(ctx.state.clone(), gate)).await;

    for client in ["203.0.113.1", "203.0.113.2"] {
        let req = test::TestRequest::get()
            .uri("/health")
            .peer_addr(peer("10.0.0.1"))
            .insert_header(("X-Forwarded-For", client))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}

#[actix_web::test]
async fn test_store_failure_fail_open_admits() {
    let ctx = test_context();
    let gate = gate_over(
        Arc::new(UnreachableWindows),
        1,
        Duration::from_secs(60),
        FailMode::Open,
        false,
    );
    let app = test::init_service(create_app(ctx.state.clone(), gate)).await;

    for _ in 0..3 {
        let req = test::TestRequest::get()
            .uri("/health")
            .peer_addr(peer("192.0.2.1"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}

#[actix_web::test]
async fn test_store_failure_fail_closed_rejects() {
    let ctx = test_context();
    let gate = gate_over(
        Arc::new(UnreachableWindows),
        1,
        Duration::from_secs(60),
        FailMode::Closed,
        false,
    );
    let app = test::init_service(create_app(ctx.state.clone(), gate)).await;

    let req = test::TestRequest::get()
        .uri("/health")
        .peer_addr(peer("192.0.2.1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "SERVICE_UNAVAILABLE");
}

#[actix_web::test]
async fn test_disabled_gate_admits_everything() {
    let ctx = test_context();
    let app = test::init_service(create_app(ctx.state.clone(), RateLimitGate::disabled())).await;

    for _ in 0..10 {
        let req = test::TestRequest::get().uri("/health").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}

#[actix_web::test]
async fn test_percent_encoded_paths_share_one_quota() {
    let ctx = test_context();
    let gate = memory_gate(1, Duration::from_secs(60), false);
    let app = test::init_service(create_app(ctx.state.clone(), gate)).await;

    let req = test::TestRequest::get()
        .uri("/health")
        .peer_addr(peer("192.0.2.1"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    for uri in ["/health", "/%68ealth", "/h%65alth", "/he%61lth"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .peer_addr(peer("192.0.2.1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS, "uri {}", uri);
    }
}

#[actix_web::test]
async fn test_route_override_applies_to_encoded_path() {
    let ctx = test_context();
    let policy = Arc::new(LimitPolicy::new(Limit::per_seconds(100, 60).unwrap()));
    policy
        .set_route("/api/v1/auth/refresh", Limit::per_seconds(1, 60).unwrap())
        .unwrap();
    let windows: Arc<dyn WindowRepository> = Arc::new(MemoryWindowRepository::new());
    let gate = RequestGate::new(
        SlidingWindowLimiter::new(windows),
        policy,
        FailMode::Open,
        false,
    );
    let app = test::init_service(create_app(
        ctx.state.clone(),
        RateLimitGate::new(Arc::new(gate)),
    ))
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .peer_addr(peer("192.0.2.1"))
        .set_json(serde_json::json!({ "refresh_token": "garbage" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/r%65fresh")
        .peer_addr(peer("192.0.2.1"))
        .set_json(serde_json::json!({ "refresh_token": "garbage" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}
