//! Revocation repository trait defining the store behind the revocation ledger.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::DomainResult;

/// Key-value store with per-key expiry, holding revoked token identifiers
///
/// Keys are written with an empty value; presence means revoked. Records are
/// never updated or deleted explicitly, the store's own expiry removes them.
///
/// Implementations must bound every round-trip with a timeout and report a
/// timeout as `DomainError::StoreUnavailable`, never as "absent". They must not
/// retry a failed operation themselves.
#[async_trait]
pub trait RevocationRepository: Send + Sync {
    /// Write `key` with the given time-to-live, overwriting any existing record
    ///
    /// # Returns
    /// * `Ok(())` - Record written
    /// * `Err(DomainError::StoreUnavailable)` - Store unreachable or timed out
    async fn put(&self, key: &str, ttl: Duration) -> DomainResult<()>;

    /// Write `key` only if it does not exist yet
    ///
    /// # Returns
    /// * `Ok(true)` - This call created the record
    /// * `Ok(false)` - A record already existed
    async fn put_if_absent(&self, key: &str, ttl: Duration) -> DomainResult<bool>;

    /// Check whether an unexpired record exists for `key`
    async fn exists(&self, key: &str) -> DomainResult<bool>;
}

#[async_trait]
impl<T: RevocationRepository + ?Sized> RevocationRepository for Arc<T> {
    async fn put(&self, key: &str, ttl: Duration) -> DomainResult<()> {
        (**self).put(key, ttl).await
    }

    async fn put_if_absent(&self, key: &str, ttl: Duration) -> DomainResult<bool> {
        (**self).put_if_absent(key, ttl).await
    }

    async fn exists(&self, key: &str) -> DomainResult<bool> {
        (**self).exists(key).await
    }
}
