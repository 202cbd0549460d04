//! RS256 key management for JWT signing and verification

use std::fs;
use std::path::{Path, PathBuf};

use jsonwebtoken::{DecodingKey, EncodingKey};
use sso_shared::JwtConfig;

use crate::errors::TokenError;

/// Loaded RSA key pair used by the token manager
#[derive(Clone)]
pub struct Rs256KeyManager {
    /// Private key for signing JWTs
    encoding_key: EncodingKey,
    /// Public key for verifying JWTs
    decoding_key: DecodingKey,
    /// Path to private key file
    private_key_path: PathBuf,
    /// Path to public key file
    public_key_path: PathBuf,
}

impl std::fmt::Debug for Rs256KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rs256KeyManager")
            .field("private_key_path", &self.private_key_path)
            .field("public_key_path", &self.public_key_path)
            .finish()
    }
}

impl Rs256KeyManager {
    /// Creates a new RS256 key manager from key file paths
    ///
    /// # Arguments
    ///
    /// * `private_key_path` - Path to the PEM-encoded private key file
    /// * `public_key_path` - Path to the PEM-encoded public key file
    ///
    /// # Returns
    ///
    /// * `Ok(Rs256KeyManager)` - Key manager initialized successfully
    /// * `Err(TokenError::KeyLoad)` - A file is missing or not an RSA PEM key
    pub fn new<P: AsRef<Path>>(private_key_path: P, public_key_path: P) -> Result<Self, TokenError> {
        let private_key_path = private_key_path.as_ref().to_path_buf();
        let public_key_path = public_key_path.as_ref().to_path_buf();

        let private_key_pem = fs::read(&private_key_path).map_err(|e| TokenError::KeyLoad {
            message: format!("Failed to read private key {}: {}", private_key_path.display(), e),
        })?;
        let encoding_key = parse_private_key(&private_key_pem)?;

        let decoding_key = load_public_key(&public_key_path)?;

        Ok(Self {
            encoding_key,
            decoding_key,
            private_key_path,
            public_key_path,
        })
    }

    /// Creates a key manager from the configured key paths
    pub fn from_config(config: &JwtConfig) -> Result<Self, TokenError> {
        Self::new(&config.private_key_path, &config.public_key_path)
    }

    /// Creates a key manager from PEM strings (useful for testing or embedded keys)
    pub fn from_pem_strings(private_key_pem: &str, public_key_pem: &str) -> Result<Self, TokenError> {
        Ok(Self {
            encoding_key: parse_private_key(private_key_pem.as_bytes())?,
            decoding_key: parse_public_key(public_key_pem.as_bytes())?,
            private_key_path: PathBuf::from("memory"),
            public_key_path: PathBuf::from("memory"),
        })
    }

    /// Returns the encoding key for signing JWTs
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// Returns the decoding key for verifying JWTs
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// Returns the paths to the key files
    pub fn key_paths(&self) -> (&Path, &Path) {
        (&self.private_key_path, &self.public_key_path)
    }

    pub(crate) fn into_parts(self) -> (EncodingKey, DecodingKey) {
        (self.encoding_key, self.decoding_key)
    }
}

/// Reads a PEM-encoded RSA public key from disk
pub(crate) fn load_public_key(path: &Path) -> Result<DecodingKey, TokenError> {
    let pem = fs::read(path).map_err(|e| TokenError::KeyLoad {
        message: format!("Failed to read public key {}: {}", path.display(), e),
    })?;
    parse_public_key(&pem)
}

pub(crate) fn parse_public_key(pem: &[u8]) -> Result<DecodingKey, TokenError> {
    DecodingKey::from_rsa_pem(pem).map_err(|e| TokenError::KeyLoad {
        message: format!("Invalid public key format: {}", e),
    })
}

fn parse_private_key(pem: &[u8]) -> Result<EncodingKey, TokenError> {
    EncodingKey::from_rsa_pem(pem).map_err(|e| TokenError::KeyLoad {
        message: format!("Invalid private key format: {}", e),
    })
}
