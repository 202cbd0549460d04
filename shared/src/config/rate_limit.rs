//! Rate limiting configuration module

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{env_flag, env_parse, env_var, ConfigError};

/// What the request gate does when the limiter's store cannot answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailMode {
    /// Let the request through and log the incident
    #[default]
    Open,
    /// Reject the request as unavailable
    Closed,
}

impl std::fmt::Display for FailMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailMode::Open => write!(f, "open"),
            FailMode::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for FailMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" | "fail-open" => Ok(FailMode::Open),
            "closed" | "fail-closed" => Ok(FailMode::Closed),
            _ => Err(format!("Invalid fail mode: {}", s)),
        }
    }
}

/// Quota override for a single route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteLimit {
    /// Requests allowed per window
    pub count: u32,

    /// Window length in seconds
    pub window_secs: u64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Requests allowed per window for routes without an override
    #[serde(default = "default_count")]
    pub default_count: u32,

    /// Default window length in seconds
    #[serde(default = "default_window_secs")]
    pub default_window_secs: u64,

    /// Behaviour when the store is unreachable
    #[serde(default)]
    pub fail_mode: FailMode,

    /// Honour `X-Forwarded-For` / `X-Real-IP` from a trusted reverse proxy
    #[serde(default)]
    pub trust_proxy: bool,

    /// Per-route overrides keyed by full route name
    #[serde(default)]
    pub routes: HashMap<String, RouteLimit>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            default_count: default_count(),
            default_window_secs: default_window_secs(),
            fail_mode: FailMode::default(),
            trust_proxy: false,
            routes: HashMap::new(),
        }
    }
}

impl RateLimitConfig {
    /// Create from `SSO_RATE_LIMIT_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let routes = match env_var("SSO_RATE_LIMIT_ROUTES") {
            Some(raw) => Self::parse_routes(&raw)?,
            None => HashMap::new(),
        };

        Ok(Self {
            enabled: env_flag("SSO_RATE_LIMIT_ENABLED", default_enabled())?,
            default_count: env_parse("SSO_RATE_LIMIT_COUNT", default_count())?,
            default_window_secs: env_parse("SSO_RATE_LIMIT_WINDOW_SECS", default_window_secs())?,
            fail_mode: env_parse("SSO_RATE_LIMIT_FAIL_MODE", FailMode::default())?,
            trust_proxy: env_flag("SSO_RATE_LIMIT_TRUST_PROXY", false)?,
            routes,
        })
    }

    /// Parse `route=count/window_secs` entries separated by `;`
    pub fn parse_routes(raw: &str) -> Result<HashMap<String, RouteLimit>, ConfigError> {
        let invalid = |entry: &str, reason: &str| ConfigError::InvalidValue {
            key: String::from("SSO_RATE_LIMIT_ROUTES"),
            message: format!("'{}': {}", entry, reason),
        };

        let mut routes = HashMap::new();
        for entry in raw.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (route, limit) = entry
                .rsplit_once('=')
                .ok_or_else(|| invalid(entry, "expected route=count/window_secs"))?;
            let (count, window) = limit
                .split_once('/')
                .ok_or_else(|| invalid(entry, "expected count/window_secs"))?;

            let route = route.trim();
            if route.is_empty() {
                return Err(invalid(entry, "route name is empty"));
            }
            let count = count
                .trim()
                .parse()
                .map_err(|_| invalid(entry, "count is not a number"))?;
            let window_secs = window
                .trim()
                .parse()
                .map_err(|_| invalid(entry, "window is not a number"))?;

            routes.insert(route.to_string(), RouteLimit { count, window_secs });
        }
        Ok(routes)
    }

    /// Reject zero counts and windows, default or per route
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_count == 0 || self.default_window_secs == 0 {
            return Err(ConfigError::invalid(
                "default rate limit count and window must be positive",
            ));
        }
        for (route, limit) in &self.routes {
            if limit.count == 0 || limit.window_secs == 0 {
                return Err(ConfigError::invalid(format!(
                    "rate limit for route '{}' must have positive count and window",
                    route
                )));
            }
        }
        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}

fn default_count() -> u32 {
    100
}

fn default_window_secs() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_defaults() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.default_count, 100);
        assert_eq!(config.default_window_secs, 60);
        assert_eq!(config.fail_mode, FailMode::Open);
        assert!(!config.trust_proxy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_routes() {
        let routes = RateLimitConfig::parse_routes(
            "/api/v1/auth/refresh=10/60; /api/v1/auth/logout = 5/30 ;",
        )
        .unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(
            routes["/api/v1/auth/refresh"],
            RouteLimit { count: 10, window_secs: 60 }
        );
        assert_eq!(
            routes["/api/v1/auth/logout"],
            RouteLimit { count: 5, window_secs: 30 }
        );
    }

    #[test]
    fn test_parse_routes_rejects_malformed_entries() {
        assert!(RateLimitConfig::parse_routes("/login").is_err());
        assert!(RateLimitConfig::parse_routes("/login=10").is_err());
        assert!(RateLimitConfig::parse_routes("/login=ten/60").is_err());
        assert!(RateLimitConfig::parse_routes("=10/60").is_err());
    }

    #[test]
    fn test_validate_rejects_zero_route_window() {
        let mut config = RateLimitConfig::default();
        config
            .routes
            .insert("/login".to_string(), RouteLimit { count: 3, window_secs: 0 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fail_mode_from_str() {
        assert_eq!("closed".parse::<FailMode>().unwrap(), FailMode::Closed);
        assert_eq!("Fail-Open".parse::<FailMode>().unwrap(), FailMode::Open);
        assert!("maybe".parse::<FailMode>().is_err());
    }
}
