//! Cache configuration module

use serde::{Deserialize, Serialize};

use super::{env_parse, env_var, ConfigError};

/// Redis cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    pub connection_timeout: u64,

    /// Per-command response timeout in seconds
    pub response_timeout: u64,

    /// Connection attempts at startup before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff between connection attempts in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Lifetime of cached identity profiles in seconds
    #[serde(default = "default_profile_ttl")]
    pub profile_ttl: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            connection_timeout: 5,
            response_timeout: 2,
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            profile_ttl: default_profile_ttl(),
        }
    }
}

impl CacheConfig {
    /// Create from `SSO_REDIS_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            url: env_var("SSO_REDIS_URL").unwrap_or(defaults.url),
            connection_timeout: env_parse(
                "SSO_REDIS_CONNECT_TIMEOUT_SECS",
                defaults.connection_timeout,
            )?,
            response_timeout: env_parse(
                "SSO_REDIS_RESPONSE_TIMEOUT_SECS",
                defaults.response_timeout,
            )?,
            max_retries: env_parse("SSO_REDIS_MAX_RETRIES", defaults.max_retries)?,
            retry_delay_ms: defaults.retry_delay_ms,
            profile_ttl: env_parse("SSO_REDIS_PROFILE_TTL_SECS", defaults.profile_ttl)?,
        })
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::invalid("redis url must not be empty"));
        }
        if self.connection_timeout == 0 || self.response_timeout == 0 {
            return Err(ConfigError::invalid("redis timeouts must be positive"));
        }
        Ok(())
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}

fn default_profile_ttl() -> u64 {
    24 * 60 * 60
}
