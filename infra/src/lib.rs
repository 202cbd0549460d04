//! # Infrastructure Layer
//!
//! Redis adapters for the repository traits declared in `sso_core`:
//!
//! - **Cache**: the Redis client, the revocation store and the identity profile cache
//! - **Services**: the atomic sliding-window store behind the rate limiter
//!
//! Every store command is bounded by the configured response timeout. A
//! timeout or a broken connection surfaces as `DomainError::StoreUnavailable`
//! so the rate-limit gate can apply its fail mode.

use std::sync::Arc;

use sso_core::DomainError;
use sso_shared::CacheConfig;

/// Cache module - Redis client and key/value stores
pub mod cache;

/// Services module - Redis-backed rate limiting
pub mod services;

pub use cache::{RedisClient, RedisIdentityCache, RedisRevocationRepository};
pub use services::rate_limit::RedisWindowRepository;

/// Redis-backed stores sharing one multiplexed connection
#[derive(Clone)]
pub struct RedisStores {
    pub client: Arc<RedisClient>,
    pub revocations: Arc<RedisRevocationRepository>,
    pub windows: Arc<RedisWindowRepository>,
    pub identities: Arc<RedisIdentityCache>,
}

/// Connect to Redis and build every store on the shared connection
pub async fn initialize(config: &CacheConfig) -> Result<RedisStores, InfrastructureError> {
    tracing::info!("Initializing Redis stores...");

    let client = Arc::new(RedisClient::new(config).await?);
    let stores = RedisStores {
        revocations: Arc::new(RedisRevocationRepository::new(client.clone())),
        windows: Arc::new(RedisWindowRepository::new(client.clone())),
        identities: Arc::new(RedisIdentityCache::new(
            client.clone(),
            std::time::Duration::from_secs(config.profile_ttl),
        )),
        client,
    };

    tracing::info!("Redis stores initialized successfully");
    Ok(stores)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Command did not answer within the response timeout
    #[error("Cache operation '{operation}' timed out after {timeout_ms}ms")]
    Timeout { operation: &'static str, timeout_ms: u64 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stored value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl InfrastructureError {
    /// Whether the store itself was unreachable, as opposed to a bad request or value
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Cache(e) => cache::redis_client::is_retriable_error(e),
            Self::Config(_) | Self::Serialization(_) => false,
        }
    }
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        if err.is_unavailable() {
            DomainError::StoreUnavailable {
                message: err.to_string(),
            }
        } else {
            DomainError::Internal {
                message: err.to_string(),
            }
        }
    }
}
