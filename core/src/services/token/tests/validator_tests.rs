//! Tests for the verify-only token validator

use super::{alice, expired_manager, test_manager, OTHER_PUBLIC_KEY, TEST_PUBLIC_KEY};
use crate::errors::TokenError;
use crate::services::token::TokenValidator;

#[test]
fn test_validator_from_manager_parses_both_token_kinds() {
    let manager = test_manager();
    let validator = manager.validator();
    let pair = manager.issue_token_pair(&alice()).unwrap();

    let access = validator.parse_access(&pair.access_token).unwrap();
    assert_eq!(access.identity(), alice());

    let refresh = validator.parse_refresh(&pair.refresh_token).unwrap();
    assert_eq!(refresh.user_id, 42);
}

#[test]
fn test_validator_from_public_key_pem() {
    let validator = TokenValidator::from_public_key_pem(TEST_PUBLIC_KEY).unwrap();
    let token = test_manager().issue_access(&alice()).unwrap();

    assert_eq!(validator.parse_access(&token).unwrap().username, "alice");
}

#[test]
fn test_validator_from_public_key_file() {
    let path = format!("{}/keys/test_public_key.pem", env!("CARGO_MANIFEST_DIR"));
    let validator = TokenValidator::from_public_key_file(path).unwrap();
    let token = test_manager().issue_refresh(&alice()).unwrap();

    assert!(validator.parse_refresh(&token).is_ok());
}

#[test]
fn test_validator_with_other_key_rejects_token() {
    let validator = TokenValidator::from_public_key_pem(OTHER_PUBLIC_KEY).unwrap();
    let token = test_manager().issue_access(&alice()).unwrap();

    assert_eq!(validator.parse_access(&token), Err(TokenError::TokenInvalid));
}

#[test]
fn test_validator_distinguishes_expiry() {
    let validator = test_manager().validator();
    let token = expired_manager().issue_access(&alice()).unwrap();

    assert_eq!(validator.parse_access(&token), Err(TokenError::TokenExpired));
}

#[test]
fn test_validator_rejects_invalid_key_material() {
    assert!(matches!(
        TokenValidator::from_public_key_pem("-----BEGIN PUBLIC KEY-----\nnope\n-----END PUBLIC KEY-----"),
        Err(TokenError::KeyLoad { .. })
    ));
    assert!(matches!(
        TokenValidator::from_public_key_file("/nonexistent/public.pem"),
        Err(TokenError::KeyLoad { .. })
    ));
}
