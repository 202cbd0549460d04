//! Redis implementation of the revocation repository

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use sso_core::{DomainResult, RevocationRepository};

use super::redis_client::RedisClient;

/// Revocation markers stored as empty strings with a millisecond expiry
///
/// Redis drops each marker once the token it guards would have expired anyway.
#[derive(Clone)]
pub struct RedisRevocationRepository {
    client: Arc<RedisClient>,
}

impl RedisRevocationRepository {
    pub fn new(client: Arc<RedisClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RevocationRepository for RedisRevocationRepository {
    async fn put(&self, key: &str, ttl: Duration) -> DomainResult<()> {
        self.client.set_with_expiry(key, "", ttl).await?;
        debug!(key = %key, ttl_ms = ttl.as_millis() as u64, "revocation marker written");
        Ok(())
    }

    async fn put_if_absent(&self, key: &str, ttl: Duration) -> DomainResult<bool> {
        let created = self.client.set_if_absent(key, "", ttl).await?;
        debug!(key = %key, created, "conditional revocation marker");
        Ok(created)
    }

    async fn exists(&self, key: &str) -> DomainResult<bool> {
        Ok(self.client.exists(key).await?)
    }
}
