//! Denylist of refresh token identifiers revoked before their natural expiry

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::RevocationRepository;

/// Namespace for revocation records
pub const REVOKED_KEY_PREFIX: &str = "token:revoked:";

/// Store key for a revoked token identifier
pub fn revocation_key(token_id: &str) -> String {
    format!("{}{}", REVOKED_KEY_PREFIX, token_id)
}

/// Writes and checks revocation records
///
/// A record lives exactly as long as the token it revokes. Once the token
/// expires it is rejected on signature grounds alone, so the store's expiry is
/// the only cleanup the ledger needs.
pub struct RevocationLedger<R: RevocationRepository> {
    repository: R,
}

impl<R: RevocationRepository> RevocationLedger<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Revoke `token_id` until `expires_at`
    ///
    /// # Errors
    ///
    /// * `TokenError::TokenAlreadyExpired` - `expires_at` is not in the future; nothing is written
    /// * `DomainError::StoreUnavailable` - Store unreachable or timed out
    pub async fn revoke(&self, token_id: &str, expires_at: DateTime<Utc>) -> DomainResult<()> {
        let ttl = remaining_lifetime(token_id, expires_at)?;
        self.repository.put(&revocation_key(token_id), ttl).await?;

        info!(ttl_ms = ttl.as_millis() as u64, "refresh token revoked");
        Ok(())
    }

    /// Revoke `token_id` only if it was not revoked already
    ///
    /// Returns `true` when this call performed the revocation. Two concurrent
    /// callers presenting the same token cannot both get `true`.
    pub async fn revoke_once(&self, token_id: &str, expires_at: DateTime<Utc>) -> DomainResult<bool> {
        let ttl = remaining_lifetime(token_id, expires_at)?;
        let created = self
            .repository
            .put_if_absent(&revocation_key(token_id), ttl)
            .await?;

        debug!(created, ttl_ms = ttl.as_millis() as u64, "claimed refresh token id");
        Ok(created)
    }

    pub async fn is_revoked(&self, token_id: &str) -> DomainResult<bool> {
        if token_id.is_empty() {
            return Err(DomainError::Validation {
                message: "token id must not be empty".to_string(),
            });
        }
        self.repository.exists(&revocation_key(token_id)).await
    }
}

/// Time until `expires_at`, truncated to whole milliseconds
fn remaining_lifetime(token_id: &str, expires_at: DateTime<Utc>) -> DomainResult<Duration> {
    if token_id.is_empty() {
        return Err(DomainError::Validation {
            message: "token id must not be empty".to_string(),
        });
    }

    let remaining_ms = (expires_at - Utc::now()).num_milliseconds();
    if remaining_ms <= 0 {
        return Err(TokenError::TokenAlreadyExpired.into());
    }
    Ok(Duration::from_millis(remaining_ms as u64))
}
