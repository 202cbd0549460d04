//! Identity profiles cached in Redis for the refresh flow

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use sso_core::{DomainError, DomainResult, IdentityProvider, TokenIdentity};

use super::redis_client::RedisClient;
use crate::InfrastructureError;

/// Key prefix for cached profiles
pub const PROFILE_KEY_PREFIX: &str = "user:profile:";

/// Cache key for a user's profile
pub fn profile_key(user_id: i64) -> String {
    format!("{}{}", PROFILE_KEY_PREFIX, user_id)
}

/// JSON-encoded identity profiles with a fixed lifetime
///
/// A profile is written at login and read back when a refresh token is
/// exchanged. Once it expires the user has to log in again.
#[derive(Clone)]
pub struct RedisIdentityCache {
    client: Arc<RedisClient>,
    ttl: Duration,
}

impl RedisIdentityCache {
    pub fn new(client: Arc<RedisClient>, ttl: Duration) -> Self {
        Self { client, ttl }
    }

    /// Lifetime given to stored profiles
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drop a cached profile, returning whether one was present
    pub async fn remove_identity(&self, user_id: i64) -> DomainResult<bool> {
        Ok(self.client.delete(&profile_key(user_id)).await?)
    }
}

#[async_trait]
impl IdentityProvider for RedisIdentityCache {
    async fn find_identity(&self, user_id: i64) -> DomainResult<Option<TokenIdentity>> {
        let Some(data) = self.client.get(&profile_key(user_id)).await? else {
            debug!(user_id, "identity profile not cached");
            return Ok(None);
        };

        decode_identity(&data).map(Some).map_err(|e| {
            error!(user_id, error = %e, "failed to decode cached profile");
            DomainError::from(e)
        })
    }

    async fn store_identity(&self, identity: &TokenIdentity) -> DomainResult<()> {
        let data = serde_json::to_string(identity).map_err(InfrastructureError::from)?;
        self.client
            .set_with_expiry(&profile_key(identity.user_id), &data, self.ttl)
            .await?;
        debug!(user_id = identity.user_id, "identity profile cached");
        Ok(())
    }
}

pub(crate) fn decode_identity(data: &str) -> Result<TokenIdentity, InfrastructureError> {
    Ok(serde_json::from_str(data)?)
}
