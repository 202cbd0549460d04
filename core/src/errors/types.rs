//! Token-related error types
//!
//! Expiry is reported separately from every other validation failure so callers
//! can treat it as an ordinary terminal state rather than a tampering signal.

use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Identity supplied for issuance is incomplete
    #[error("Invalid token data: {reason}")]
    InvalidData { reason: String },

    #[error("Token expired")]
    TokenExpired,

    /// Structurally malformed token (segments, base64, JSON)
    #[error("Token parse error: {message}")]
    TokenParse { message: String },

    /// Signature or claim validation failed
    #[error("Token invalid")]
    TokenInvalid,

    /// Declared algorithm is outside the accepted RSA family
    #[error("Unexpected signing method: {algorithm}")]
    SigningMethodMismatch { algorithm: String },

    #[error("Token revoked")]
    TokenRevoked,

    /// Revocation requested for a token that is already past its expiry
    #[error("Token already expired, nothing to revoke")]
    TokenAlreadyExpired,

    #[error("Key load error: {message}")]
    KeyLoad { message: String },

    #[error("Token signing failed: {message}")]
    SigningFailed { message: String },
}

impl TokenError {
    pub(crate) fn invalid_data(reason: impl Into<String>) -> Self {
        Self::InvalidData {
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::TokenParse {
            message: message.into(),
        }
    }

    /// Failures that indicate a malformed, tampered or replayed token
    pub fn is_security_event(&self) -> bool {
        matches!(
            self,
            Self::TokenParse { .. }
                | Self::TokenInvalid
                | Self::SigningMethodMismatch { .. }
                | Self::TokenRevoked
        )
    }

    /// Either flavour of "past its `exp`"
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::TokenExpired | Self::TokenAlreadyExpired)
    }
}
