//! Identity lookup used when re-issuing tokens.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::token::TokenIdentity;
use crate::errors::DomainResult;

/// Source of the current identity for a user id
///
/// Refresh tokens carry only the user id, so the refresh flow asks this
/// provider for the username and email to put into the new access token.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Find the identity for a user
    ///
    /// # Returns
    /// * `Ok(Some(TokenIdentity))` - Identity found
    /// * `Ok(None)` - Unknown user
    /// * `Err(DomainError)` - Lookup failed
    async fn find_identity(&self, user_id: i64) -> DomainResult<Option<TokenIdentity>>;

    /// Record the identity seen at login so later refreshes can find it
    async fn store_identity(&self, identity: &TokenIdentity) -> DomainResult<()>;
}

#[async_trait]
impl<T: IdentityProvider + ?Sized> IdentityProvider for Arc<T> {
    async fn find_identity(&self, user_id: i64) -> DomainResult<Option<TokenIdentity>> {
        (**self).find_identity(user_id).await
    }

    async fn store_identity(&self, identity: &TokenIdentity) -> DomainResult<()> {
        (**self).store_identity(identity).await
    }
}
