//! Tests for the rate limiter, policy table and request gate


use async_trait::async_trait;
use std::time::Duration;

use crate::errors::{DomainError, DomainResult};
use crate::repositories::WindowRepository;

/// Window store that is always unreachable
pub(super) struct UnreachableWindowRepository;

#[async_trait]
impl WindowRepository for UnreachableWindowRepository {
    async fn try_acquire(&self, _key: &str, _limit: u32, _window: Duration) -> DomainResult<bool> {
        Err(DomainError::StoreUnavailable {
            message: "connection refused".to_string(),
        })
    }
}
