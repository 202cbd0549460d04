//! Sliding-window limiter

use tracing::debug;

use crate::errors::DomainResult;
use crate::repositories::WindowRepository;

use super::key::rate_limit_key;
use super::policy::Limit;

/// Answers whether an (identity, route) pair is within quota right now
///
/// Store errors are returned as-is; deciding between fail-open and
/// fail-closed is the caller's job.
pub struct SlidingWindowLimiter<W: WindowRepository> {
    store: W,
}

impl<W: WindowRepository> SlidingWindowLimiter<W> {
    pub fn new(store: W) -> Self {
        Self { store }
    }

    /// Record the request if it fits in `limit`, returning whether it was admitted
    pub async fn allow(&self, identity: &str, route: &str, limit: Limit) -> DomainResult<bool> {
        let key = rate_limit_key(identity, route);
        let allowed = self
            .store
            .try_acquire(&key, limit.count(), limit.window())
            .await?;

        if !allowed {
            debug!(
                ip = identity,
                route,
                limit = limit.count(),
                window_ms = limit.window().as_millis() as u64,
                "rate limit exceeded"
            );
        }
        Ok(allowed)
    }
}
