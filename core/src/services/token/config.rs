//! Configuration for the token manager

use chrono::Duration;
use sso_shared::config::auth::{DEFAULT_ACCESS_TOKEN_TTL, DEFAULT_REFRESH_TOKEN_TTL};
use sso_shared::JwtConfig;

/// Token lifetimes applied at issuance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenManagerConfig {
    /// Access token lifetime (default 15 minutes)
    pub access_ttl: Duration,
    /// Refresh token lifetime (default 15 days)
    pub refresh_ttl: Duration,
}

impl Default for TokenManagerConfig {
    fn default() -> Self {
        Self {
            access_ttl: Duration::seconds(DEFAULT_ACCESS_TOKEN_TTL),
            refresh_ttl: Duration::seconds(DEFAULT_REFRESH_TOKEN_TTL),
        }
    }
}

impl TokenManagerConfig {
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }
}

impl From<&JwtConfig> for TokenManagerConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            access_ttl: Duration::seconds(config.access_token_ttl),
            refresh_ttl: Duration::seconds(config.refresh_token_ttl),
        }
    }
}
