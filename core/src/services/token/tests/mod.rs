//! Tests for the token manager and validator

mod validator_tests;

use chrono::Duration;

use crate::domain::entities::token::TokenIdentity;
use crate::services::token::{Rs256KeyManager, TokenManager, TokenManagerConfig};

pub(super) const TEST_PRIVATE_KEY: &str = include_str!("../../../../keys/test_private_key.pem");
pub(super) const TEST_PUBLIC_KEY: &str = include_str!("../../../../keys/test_public_key.pem");
pub(super) const OTHER_PRIVATE_KEY: &str =
    include_str!("../../../../keys/test_other_private_key.pem");
pub(super) const OTHER_PUBLIC_KEY: &str = include_str!("../../../../keys/test_other_public_key.pem");

pub(super) fn manager_with(config: TokenManagerConfig) -> TokenManager {
    let keys = Rs256KeyManager::from_pem_strings(TEST_PRIVATE_KEY, TEST_PUBLIC_KEY)
        .expect("test keys should load");
    TokenManager::new(keys, config)
}

pub(super) fn test_manager() -> TokenManager {
    manager_with(TokenManagerConfig::default())
}

/// Manager whose tokens are already a minute past `exp` when issued
pub(super) fn expired_manager() -> TokenManager {
    manager_with(
        TokenManagerConfig::default()
            .with_access_ttl(Duration::seconds(-60))
            .with_refresh_ttl(Duration::seconds(-60)),
    )
}

pub(super) fn alice() -> TokenIdentity {
    TokenIdentity::new(42, "alice", "alice@example.com")
}
