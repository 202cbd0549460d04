//! Credential management for RS256 signed access and refresh tokens
//!
//! This module handles:
//! - RS256 key loading from PEM files or strings
//! - Access/refresh token issuance (`TokenManager`)
//! - Verify-only parsing for processes without a signing key (`TokenValidator`)
//! - Rejection of tokens declaring an algorithm outside the RSA family

mod config;
mod key_manager;
mod manager;
mod validator;
mod verifier;

#[cfg(test)]
mod tests;

pub use config::TokenManagerConfig;
pub use key_manager::Rs256KeyManager;
pub use manager::TokenManager;
pub use validator::TokenValidator;
pub use verifier::ACCEPTED_ALGORITHMS;
