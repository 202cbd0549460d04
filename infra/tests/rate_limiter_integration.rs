//! Integration tests for the Redis sliding-window limiter
//!
//! These tests require Redis to be running locally on port 6379.
//! Run with: cargo test -p sso_infra --test rate_limiter_integration -- --ignored

use std::sync::Arc;
use std::time::Duration;

use sso_core::{Limit, SlidingWindowLimiter, WindowRepository};
use sso_infra::{RedisClient, RedisWindowRepository};
use sso_shared::CacheConfig;

async fn create_client() -> Arc<RedisClient> {
    let config = CacheConfig::new(
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
    );
    let client = RedisClient::new(&config)
        .await
        .expect("Failed to create Redis client");
    Arc::new(client)
}

async fn create_store() -> Arc<RedisWindowRepository> {
    Arc::new(RedisWindowRepository::new(create_client().await))
}

fn test_route() -> String {
    format!("/test/{}", rand::random::<u64>())
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_limit_enforced_then_recovers() {
    let limiter = SlidingWindowLimiter::new(create_store().await);
    let limit = Limit::new(3, Duration::from_secs(1)).unwrap();
    let route = test_route();

    for i in 1..=3 {
        assert!(
            limiter.allow("10.0.0.1", &route, limit).await.unwrap(),
            "Request {} should be allowed",
            i
        );
    }
    assert!(!limiter.allow("10.0.0.1", &route, limit).await.unwrap());

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert!(limiter.allow("10.0.0.1", &route, limit).await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_concurrent_requests_never_exceed_limit() {
    let limiter = Arc::new(SlidingWindowLimiter::new(create_store().await));
    let limit = Limit::new(5, Duration::from_secs(10)).unwrap();
    let route = test_route();

    let mut handles = Vec::new();
    for _ in 0..50 {
        let limiter = limiter.clone();
        let route = route.clone();
        handles.push(tokio::spawn(async move {
            limiter.allow("2001:db8::1", &route, limit).await.unwrap()
        }));
    }

    let mut allowed = 0;
    for handle in handles {
        if handle.await.unwrap() {
            allowed += 1;
        }
    }
    assert_eq!(allowed, 5);
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_window_key_expires_and_resets() {
    let client = create_client().await;
    let store = RedisWindowRepository::new(client.clone());
    let key = format!("ratelimit10.0.0.9#{}", test_route());

    assert!(store.try_acquire(&key, 1, Duration::from_secs(30)).await.unwrap());
    assert!(!store.try_acquire(&key, 1, Duration::from_secs(30)).await.unwrap());

    let ttl = client.ttl(&key).await.unwrap().expect("window key has an expiry");
    assert!(ttl <= 30_000);

    assert!(client.delete(&key).await.unwrap());
    assert!(store.try_acquire(&key, 1, Duration::from_secs(30)).await.unwrap());
}
