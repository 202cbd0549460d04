//! Token manager: issues and parses access and refresh tokens

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Serialize;
use sso_shared::JwtConfig;
use tracing::debug;

use crate::domain::entities::token::{AccessClaims, RefreshClaims, TokenIdentity, TokenPair};
use crate::errors::TokenError;

use super::config::TokenManagerConfig;
use super::key_manager::Rs256KeyManager;
use super::validator::TokenValidator;
use super::verifier::TokenVerifier;

/// Random bytes behind each refresh token identifier (256 bits)
const TOKEN_ID_BYTES: usize = 32;

/// Issues RS256 signed tokens and verifies them with the matching public key
///
/// Holds the private key. Hand out [`TokenManager::validator`] to code that
/// only needs to verify.
pub struct TokenManager {
    encoding_key: EncodingKey,
    verifier: TokenVerifier,
    config: TokenManagerConfig,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    pub fn new(keys: Rs256KeyManager, config: TokenManagerConfig) -> Self {
        let (encoding_key, decoding_key) = keys.into_parts();
        Self {
            encoding_key,
            verifier: TokenVerifier::new(decoding_key),
            config,
        }
    }

    /// Loads the key pair from the configured paths
    pub fn from_config(config: &JwtConfig) -> Result<Self, TokenError> {
        let keys = Rs256KeyManager::from_config(config)?;
        Ok(Self::new(keys, TokenManagerConfig::from(config)))
    }

    pub fn config(&self) -> &TokenManagerConfig {
        &self.config
    }

    /// A verify-only handle sharing this manager's public key
    pub fn validator(&self) -> TokenValidator {
        TokenValidator::from_verifier(self.verifier.clone())
    }

    /// Signs an access token carrying the identity's id, username and email
    ///
    /// # Errors
    ///
    /// * `TokenError::InvalidData` - A field of the identity is zero or empty
    /// * `TokenError::SigningFailed` - The RSA signing step failed
    pub fn issue_access(&self, identity: &TokenIdentity) -> Result<String, TokenError> {
        identity.validate()?;

        let now = Utc::now();
        let claims = AccessClaims::new(
            identity,
            now.timestamp(),
            (now + self.config.access_ttl).timestamp(),
        );
        self.sign(&claims)
    }

    /// Signs a refresh token with a fresh random `jti`
    ///
    /// The identifier is never derived from user data so it cannot be enumerated.
    pub fn issue_refresh(&self, identity: &TokenIdentity) -> Result<String, TokenError> {
        identity.validate()?;

        let now = Utc::now();
        let claims = RefreshClaims {
            user_id: identity.user_id,
            jti: generate_token_id()?,
            exp: (now + self.config.refresh_ttl).timestamp(),
            iat: now.timestamp(),
        };
        self.sign(&claims)
    }

    /// Issues both tokens; a failure in either half fails the whole call
    pub fn issue_token_pair(&self, identity: &TokenIdentity) -> Result<TokenPair, TokenError> {
        let access_token = self.issue_access(identity)?;
        let refresh_token = self.issue_refresh(identity)?;

        debug!(user_id = identity.user_id, "issued token pair");

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_ttl.num_seconds(),
            self.config.refresh_ttl.num_seconds(),
        ))
    }

    /// Verifies an access token and returns its claims
    ///
    /// # Errors
    ///
    /// * `TokenError::TokenExpired` - `exp` is in the past
    /// * `TokenError::SigningMethodMismatch` - Header declares a non-RSA algorithm
    /// * `TokenError::TokenInvalid` - Signature does not verify
    /// * `TokenError::TokenParse` - Token is structurally malformed
    pub fn parse_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.verifier.verify(token)
    }

    /// Verifies a refresh token and returns its claims; errors as for [`Self::parse_access`]
    pub fn parse_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        self.verifier.verify(token)
    }

    fn sign<C: Serialize>(&self, claims: &C) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::RS256), claims, &self.encoding_key).map_err(|e| {
            TokenError::SigningFailed {
                message: e.to_string(),
            }
        })
    }
}

fn generate_token_id() -> Result<String, TokenError> {
    let mut bytes = [0u8; TOKEN_ID_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| TokenError::SigningFailed {
            message: format!("generate token id: {}", e),
        })?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
