//! Token entities for JWT-based authentication.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::TokenError;

/// The identity bound into an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenIdentity {
    /// Non-zero user identifier
    pub user_id: i64,

    pub username: String,

    pub email: String,
}

impl TokenIdentity {
    pub fn new(user_id: i64, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            email: email.into(),
        }
    }

    /// Every field must be present before a token may be issued
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.user_id == 0 {
            return Err(TokenError::invalid_data("user id must be non-zero"));
        }
        if self.username.trim().is_empty() {
            return Err(TokenError::invalid_data("username must not be empty"));
        }
        if self.email.trim().is_empty() {
            return Err(TokenError::invalid_data("email must not be empty"));
        }
        Ok(())
    }
}

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub user_id: i64,

    pub username: String,

    pub email: String,

    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,

    /// Issued at timestamp (seconds since epoch)
    pub iat: i64,
}

impl AccessClaims {
    pub(crate) fn new(identity: &TokenIdentity, iat: i64, exp: i64) -> Self {
        Self {
            user_id: identity.user_id,
            username: identity.username.clone(),
            email: identity.email.clone(),
            exp,
            iat,
        }
    }

    /// The identity these claims were issued for
    pub fn identity(&self) -> TokenIdentity {
        TokenIdentity::new(self.user_id, self.username.clone(), self.email.clone())
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        timestamp_to_datetime(self.exp)
    }
}

/// Claims carried by a refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub user_id: i64,

    /// Random token identifier, the revocation ledger's key
    pub jti: String,

    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,

    /// Issued at timestamp (seconds since epoch)
    pub iat: i64,
}

impl RefreshClaims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        timestamp_to_datetime(self.exp)
    }
}

/// Access and refresh token issued together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub access_expires_in: i64,

    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in,
            refresh_expires_in,
        }
    }
}

fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(ts, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
