//! Redis cache client implementation
//!
//! Wraps a multiplexed connection with startup retry and a per-command
//! response timeout. Commands are never retried: a revocation write or a
//! window admission that silently ran twice would change the result.

use std::future::Future;
use std::time::Duration;

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use sso_shared::CacheConfig;

use crate::InfrastructureError;

/// Upper bound for the connect backoff
const MAX_BACKOFF_MS: u64 = 5000;

/// Redis client shared by every store
///
/// Cloning is cheap; clones share the underlying multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Bound on every command round trip
    response_timeout: Duration,
    /// Connection URL with credentials masked, for logs
    masked_url: String,
}

impl RedisClient {
    /// Connect using the cache configuration
    ///
    /// Retries the initial connection `max_retries` times with exponential
    /// backoff starting at `retry_delay_ms`.
    ///
    /// # Example
    /// ```no_run
    /// use sso_infra::cache::redis_client::RedisClient;
    /// use sso_shared::CacheConfig;
    ///
    /// async fn create_client() -> Result<RedisClient, Box<dyn std::error::Error>> {
    ///     let config = CacheConfig::new("redis://localhost:6379");
    ///     let client = RedisClient::new(&config).await?;
    ///     Ok(client)
    /// }
    /// ```
    pub async fn new(config: &CacheConfig) -> Result<Self, InfrastructureError> {
        let masked_url = mask_url(&config.url);
        info!("Creating Redis client with URL: {}", masked_url);

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::create_connection_with_retry(
            client,
            Duration::from_secs(config.connection_timeout),
            config.max_retries.max(1),
            config.retry_delay_ms,
        )
        .await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            response_timeout: Duration::from_secs(config.response_timeout),
            masked_url,
        })
    }

    async fn create_connection_with_retry(
        client: Client,
        connect_timeout: Duration,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            let outcome = match timeout(connect_timeout, client.get_multiplexed_async_connection())
                .await
            {
                Ok(result) => result.map_err(InfrastructureError::Cache),
                Err(_) => Err(InfrastructureError::Timeout {
                    operation: "connect",
                    timeout_ms: duration_ms(connect_timeout),
                }),
            };

            match outcome {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries && e.is_unavailable() => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_BACKOFF_MS);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }

    /// A handle on the shared connection
    pub fn get_connection(&self) -> MultiplexedConnection {
        self.connection.clone()
    }

    /// Configured response timeout
    pub fn response_timeout(&self) -> Duration {
        self.response_timeout
    }

    /// Connection URL with credentials masked
    pub fn url(&self) -> &str {
        &self.masked_url
    }

    /// Run one command under the response timeout
    ///
    /// `operation` names the command in errors and logs.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, f: F) -> Result<T, InfrastructureError>
    where
        F: FnOnce(MultiplexedConnection) -> Fut,
        Fut: Future<Output = RedisResult<T>>,
    {
        match timeout(self.response_timeout, f(self.connection.clone())).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                error!("Redis {} failed: {}", operation, e);
                Err(InfrastructureError::Cache(e))
            }
            Err(_) => {
                error!(
                    "Redis {} timed out after {}ms",
                    operation,
                    duration_ms(self.response_timeout)
                );
                Err(InfrastructureError::Timeout {
                    operation,
                    timeout_ms: duration_ms(self.response_timeout),
                })
            }
        }
    }

    /// Set a value with a millisecond expiry
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), InfrastructureError> {
        let ttl_ms = expiry_ms(ttl);
        debug!("Setting key '{}' with expiry {}ms", key, ttl_ms);

        self.run("set", |mut conn| async move {
            redis::cmd("SET")
                .arg(key)
                .arg(value)
                .arg("PX")
                .arg(ttl_ms)
                .query_async::<_, ()>(&mut conn)
                .await
        })
        .await
    }

    /// Set a value with a millisecond expiry unless the key already exists
    ///
    /// # Returns
    /// * `Ok(true)` - This call created the key
    /// * `Ok(false)` - The key was already present
    pub async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, InfrastructureError> {
        let ttl_ms = expiry_ms(ttl);
        debug!("Setting key '{}' if absent with expiry {}ms", key, ttl_ms);

        let reply = self
            .run("set_nx", |mut conn| async move {
                redis::cmd("SET")
                    .arg(key)
                    .arg(value)
                    .arg("PX")
                    .arg(ttl_ms)
                    .arg("NX")
                    .query_async::<_, Option<String>>(&mut conn)
                    .await
            })
            .await?;

        Ok(reply.is_some())
    }

    /// Get a value from cache
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        debug!("Getting key '{}'", key);

        let value = self
            .run("get", |mut conn| async move {
                conn.get::<_, Option<String>>(key).await
            })
            .await?;

        if value.is_none() {
            debug!("Key '{}' not found", key);
        }
        Ok(value)
    }

    /// Check whether a key exists
    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        self.run("exists", |mut conn| async move {
            conn.exists::<_, bool>(key).await
        })
        .await
    }

    /// Delete a key, returning whether it was present
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        debug!("Deleting key '{}'", key);

        let deleted = self
            .run("del", |mut conn| async move { conn.del::<_, u32>(key).await })
            .await?;
        Ok(deleted > 0)
    }

    /// Remaining lifetime of a key in milliseconds, `None` when missing or persistent
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>, InfrastructureError> {
        let pttl = self
            .run("pttl", |mut conn| async move {
                redis::cmd("PTTL").arg(key).query_async::<_, i64>(&mut conn).await
            })
            .await?;

        Ok((pttl >= 0).then_some(pttl))
    }

    /// Check if the Redis connection is healthy
    ///
    /// Performs a PING command to verify connectivity.
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        debug!("Performing Redis health check");

        let response = self
            .run("ping", |mut conn| async move {
                redis::cmd("PING").query_async::<_, String>(&mut conn).await
            })
            .await?;

        if response == "PONG" {
            debug!("Redis health check passed");
            Ok(true)
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Ok(false)
        }
    }
}

/// Whether a Redis error indicates a transport problem rather than a bad command
pub fn is_retriable_error(error: &RedisError) -> bool {
    error.is_io_error()
        || error.is_connection_refusal()
        || error.is_connection_dropped()
        || error.is_timeout()
}

/// Replace credentials in a Redis URL with `****`
pub fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}****{}", &url[..scheme_end + 3], &url[at..])
        }
        _ => url.to_string(),
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// PX rejects zero, so sub-millisecond lifetimes round up to one
fn expiry_ms(ttl: Duration) -> u64 {
    duration_ms(ttl).max(1)
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_expiry_never_zero() {
        assert_eq!(expiry_ms(Duration::from_micros(300)), 1);
        assert_eq!(expiry_ms(Duration::from_millis(1500)), 1500);
    }
}
