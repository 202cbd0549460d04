//! Verify-only token handle

use std::path::Path;

use crate::domain::entities::token::{AccessClaims, RefreshClaims};
use crate::errors::TokenError;

use super::key_manager::{load_public_key, parse_public_key};
use super::verifier::TokenVerifier;

/// Parses access and refresh tokens without the ability to issue them
///
/// Built only from a public key, so a process holding a validator never holds
/// the signing secret.
#[derive(Clone)]
pub struct TokenValidator {
    verifier: TokenVerifier,
}

impl TokenValidator {
    /// Creates a validator from a PEM-encoded RSA public key
    pub fn from_public_key_pem(public_key_pem: &str) -> Result<Self, TokenError> {
        Ok(Self::from_verifier(TokenVerifier::new(parse_public_key(
            public_key_pem.as_bytes(),
        )?)))
    }

    /// Creates a validator from a PEM-encoded RSA public key file
    pub fn from_public_key_file<P: AsRef<Path>>(path: P) -> Result<Self, TokenError> {
        Ok(Self::from_verifier(TokenVerifier::new(load_public_key(
            path.as_ref(),
        )?)))
    }

    pub(crate) fn from_verifier(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    pub fn parse_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.verifier.verify(token)
    }

    pub fn parse_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        self.verifier.verify(token)
    }
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator").finish_non_exhaustive()
    }
}
