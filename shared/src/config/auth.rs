//! Token signing configuration module

use serde::{Deserialize, Serialize};

use super::{env_parse, env_var, ConfigError};

/// Default access token lifetime: 15 minutes
pub const DEFAULT_ACCESS_TOKEN_TTL: i64 = 15 * 60;

/// Default refresh token lifetime: 15 days
pub const DEFAULT_REFRESH_TOKEN_TTL: i64 = 15 * 24 * 60 * 60;

/// Shortest accepted login secret
pub const MIN_LOGIN_SECRET_LEN: usize = 32;

/// JWT configuration for RS256 signed credentials
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Path to the PEM encoded RSA private key (signing)
    #[serde(default = "default_private_key_path")]
    pub private_key_path: String,

    /// Path to the PEM encoded RSA public key (verification)
    #[serde(default = "default_public_key_path")]
    pub public_key_path: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl: i64,

    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl: i64,

    /// Shared secret an upstream login service presents to open sessions.
    /// The login route stays closed while unset.
    #[serde(default, skip_serializing)]
    pub login_secret: Option<String>,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            private_key_path: default_private_key_path(),
            public_key_path: default_public_key_path(),
            access_token_ttl: DEFAULT_ACCESS_TOKEN_TTL,
            refresh_token_ttl: DEFAULT_REFRESH_TOKEN_TTL,
            login_secret: None,
        }
    }
}

impl JwtConfig {
    /// Create from `SSO_JWT_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            private_key_path: env_var("SSO_JWT_PRIVATE_KEY_PATH")
                .unwrap_or_else(default_private_key_path),
            public_key_path: env_var("SSO_JWT_PUBLIC_KEY_PATH")
                .unwrap_or_else(default_public_key_path),
            access_token_ttl: env_parse("SSO_JWT_ACCESS_TTL_SECS", DEFAULT_ACCESS_TOKEN_TTL)?,
            refresh_token_ttl: env_parse("SSO_JWT_REFRESH_TTL_SECS", DEFAULT_REFRESH_TOKEN_TTL)?,
            login_secret: env_var("SSO_LOGIN_SECRET"),
        })
    }

    /// Reject non-positive lifetimes and an access token outliving its refresh token
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token_ttl <= 0 {
            return Err(ConfigError::invalid("access token TTL must be positive"));
        }
        if self.refresh_token_ttl <= 0 {
            return Err(ConfigError::invalid("refresh token TTL must be positive"));
        }
        if self.access_token_ttl > self.refresh_token_ttl {
            return Err(ConfigError::invalid(
                "access token TTL must not exceed refresh token TTL",
            ));
        }
        if matches!(&self.login_secret, Some(secret) if secret.len() < MIN_LOGIN_SECRET_LEN) {
            return Err(ConfigError::invalid(format!(
                "login secret must be at least {} characters",
                MIN_LOGIN_SECRET_LEN
            )));
        }
        Ok(())
    }

    /// Set access token lifetime in minutes
    pub fn with_access_ttl_minutes(mut self, minutes: i64) -> Self {
        self.access_token_ttl = minutes * 60;
        self
    }

    /// Set refresh token lifetime in days
    pub fn with_refresh_ttl_days(mut self, days: i64) -> Self {
        self.refresh_token_ttl = days * 24 * 60 * 60;
        self
    }
}

fn default_private_key_path() -> String {
    String::from("keys/private_key.pem")
}

fn default_public_key_path() -> String {
    String::from("keys/public_key.pem")
}

fn default_access_ttl() -> i64 {
    DEFAULT_ACCESS_TOKEN_TTL
}

fn default_refresh_ttl() -> i64 {
    DEFAULT_REFRESH_TOKEN_TTL
}
