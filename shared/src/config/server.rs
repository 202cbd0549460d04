//! Server configuration module

use serde::{Deserialize, Serialize};

use super::{env_parse, env_var, ConfigError};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Number of worker threads (defaults to number of CPU cores)
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
            workers: None,
        }
    }
}

impl ServerConfig {
    /// Create from `SSO_HTTP_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_var("SSO_HTTP_HOST").unwrap_or_else(|| String::from("127.0.0.1")),
            port: env_parse("SSO_HTTP_PORT", 8080)?,
            workers: match env_var("SSO_HTTP_WORKERS") {
                Some(_) => Some(env_parse("SSO_HTTP_WORKERS", 1)?),
                None => None,
            },
        })
    }

    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
