//! Session service implementation

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::token::{RefreshClaims, TokenIdentity, TokenPair};
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::{IdentityProvider, RevocationRepository};
use crate::services::revocation::RevocationLedger;
use crate::services::token::TokenManager;

/// Ties token issuance to the revocation ledger
///
/// Signature validity alone is not enough to trust a refresh token; every
/// refresh token is checked against the ledger, and each one can be exchanged
/// for a new pair at most once.
pub struct SessionService<R, I>
where
    R: RevocationRepository,
    I: IdentityProvider,
{
    tokens: Arc<TokenManager>,
    ledger: RevocationLedger<R>,
    identities: I,
}

impl<R, I> SessionService<R, I>
where
    R: RevocationRepository,
    I: IdentityProvider,
{
    pub fn new(tokens: Arc<TokenManager>, ledger: RevocationLedger<R>, identities: I) -> Self {
        Self {
            tokens,
            ledger,
            identities,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    pub fn ledger(&self) -> &RevocationLedger<R> {
        &self.ledger
    }

    /// Issue a pair for an identity whose credentials were checked elsewhere
    ///
    /// The identity is remembered so later refreshes can rebuild the access token.
    pub async fn login(&self, identity: &TokenIdentity) -> DomainResult<TokenPair> {
        let pair = self.tokens.issue_token_pair(identity)?;
        self.identities.store_identity(identity).await?;

        info!(user_id = identity.user_id, "session started");
        Ok(pair)
    }

    /// Parse a refresh token and make sure it has not been revoked
    ///
    /// # Errors
    ///
    /// * `TokenError::TokenRevoked` - Token id is in the ledger
    /// * Any parse error from [`TokenManager::parse_refresh`]
    /// * `DomainError::StoreUnavailable` - Ledger could not be consulted
    pub async fn verify_refresh(&self, refresh_token: &str) -> DomainResult<RefreshClaims> {
        let claims = self.tokens.parse_refresh(refresh_token)?;

        if self.ledger.is_revoked(&claims.jti).await? {
            warn!(user_id = claims.user_id, "revoked refresh token presented");
            return Err(TokenError::TokenRevoked.into());
        }
        Ok(claims)
    }

    /// Exchange a refresh token for a new pair, revoking the old one
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        let claims = self.verify_refresh(refresh_token).await?;

        let identity = self
            .identities
            .find_identity(claims.user_id)
            .await?
            .ok_or_else(|| {
                debug!(user_id = claims.user_id, "no identity for refresh token");
                DomainError::Unauthorized
            })?;

        let claimed = self
            .ledger
            .revoke_once(&claims.jti, claims.expires_at())
            .await?;
        if !claimed {
            warn!(user_id = claims.user_id, "refresh token reused concurrently");
            return Err(TokenError::TokenRevoked.into());
        }

        let pair = self.tokens.issue_token_pair(&identity)?;
        info!(user_id = claims.user_id, "refresh token rotated");
        Ok(pair)
    }

    /// Revoke a refresh token for the rest of its lifetime
    ///
    /// A token that reaches `exp` between parsing and the ledger write is
    /// reported as `TokenError::TokenAlreadyExpired`; nothing is written.
    pub async fn logout(&self, refresh_token: &str) -> DomainResult<()> {
        let claims = self.tokens.parse_refresh(refresh_token)?;
        if let Err(e) = self.ledger.revoke(&claims.jti, claims.expires_at()).await {
            if matches!(e, DomainError::Token(TokenError::TokenAlreadyExpired)) {
                warn!(user_id = claims.user_id, "logout for a refresh token past its expiry");
            }
            return Err(e);
        }

        info!(user_id = claims.user_id, "session ended");
        Ok(())
    }
}
