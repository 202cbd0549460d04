//! Sliding-window store used by the rate limiter.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::DomainResult;

/// Store holding one ordered log of request timestamps per rate-limit key
#[async_trait]
pub trait WindowRepository: Send + Sync {
    /// Atomically trim, count and conditionally record one request
    ///
    /// As one indivisible step:
    /// 1. drop entries at or before `now - window`
    /// 2. count the remaining entries
    /// 3. if the count is below `limit`, insert a uniquely tagged entry for
    ///    `now`, set the key's expiry to `window` and return `true`
    /// 4. otherwise return `false` without inserting
    ///
    /// # Returns
    /// * `Ok(true)` - Request admitted and recorded
    /// * `Ok(false)` - Quota exhausted for the trailing window
    /// * `Err(DomainError::StoreUnavailable)` - Store unreachable or timed out
    /// * `Err(DomainError::Internal)` - Store reachable but the operation failed
    async fn try_acquire(&self, key: &str, limit: u32, window: Duration) -> DomainResult<bool>;
}

#[async_trait]
impl<T: WindowRepository + ?Sized> WindowRepository for Arc<T> {
    async fn try_acquire(&self, key: &str, limit: u32, window: Duration) -> DomainResult<bool> {
        (**self).try_acquire(key, limit, window).await
    }
}
