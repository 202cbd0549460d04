//! Per-route quota table

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::RwLock;
use sso_shared::RateLimitConfig;

use crate::errors::{DomainError, DomainResult};

/// A quota: at most `count` requests in any trailing `window`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    count: u32,
    window: Duration,
}

impl Limit {
    /// Both the count and the window must be positive
    pub fn new(count: u32, window: Duration) -> DomainResult<Self> {
        if count == 0 {
            return Err(DomainError::Validation {
                message: "rate limit count must be positive".to_string(),
            });
        }
        if window.is_zero() {
            return Err(DomainError::Validation {
                message: "rate limit window must be positive".to_string(),
            });
        }
        Ok(Self { count, window })
    }

    pub fn per_seconds(count: u32, window_secs: u64) -> DomainResult<Self> {
        Self::new(count, Duration::from_secs(window_secs))
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Route overrides over a single default quota
///
/// Reads happen on every request; writes are rare administrative changes.
#[derive(Debug)]
pub struct LimitPolicy {
    default: Limit,
    routes: RwLock<HashMap<String, Limit>>,
}

impl LimitPolicy {
    pub fn new(default: Limit) -> Self {
        Self {
            default,
            routes: RwLock::new(HashMap::new()),
        }
    }

    /// Build the table from configuration, validating every entry
    pub fn from_config(config: &RateLimitConfig) -> DomainResult<Self> {
        let policy = Self::new(Limit::per_seconds(
            config.default_count,
            config.default_window_secs,
        )?);
        for (route, limit) in &config.routes {
            policy.set_route(route.clone(), Limit::per_seconds(limit.count, limit.window_secs)?)?;
        }
        Ok(policy)
    }

    pub fn default_limit(&self) -> Limit {
        self.default
    }

    /// Install or replace the override for `route`
    pub fn set_route(&self, route: impl Into<String>, limit: Limit) -> DomainResult<()> {
        let route = route.into();
        if route.is_empty() {
            return Err(DomainError::Validation {
                message: "route name must not be empty".to_string(),
            });
        }
        self.routes.write().insert(route, limit);
        Ok(())
    }

    pub fn remove_route(&self, route: &str) -> Option<Limit> {
        self.routes.write().remove(route)
    }

    /// Exact route match, else the default
    pub fn resolve(&self, route: &str) -> Limit {
        self.routes.read().get(route).copied().unwrap_or(self.default)
    }

    /// Snapshot of the current overrides
    pub fn routes(&self) -> HashMap<String, Limit> {
        self.routes.read().clone()
    }
}
