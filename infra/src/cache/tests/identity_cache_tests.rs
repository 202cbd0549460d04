use crate::cache::identity_cache::{decode_identity, profile_key};
use crate::InfrastructureError;
use sso_core::{DomainError, TokenIdentity};

#[test]
fn test_profile_key_format() {
    assert_eq!(profile_key(42), "user:profile:42");
    assert_eq!(profile_key(-1), "user:profile:-1");
}

#[test]
fn test_decode_cached_profile() {
    let identity = TokenIdentity::new(7, "bob", "bob@example.com");
    let data = serde_json::to_string(&identity).unwrap();

    assert_eq!(decode_identity(&data).unwrap(), identity);
}

#[test]
fn test_corrupt_profile_is_internal_error() {
    let err = decode_identity("{not json").unwrap_err();
    assert!(matches!(err, InfrastructureError::Serialization(_)));

    let domain: DomainError = err.into();
    assert!(matches!(domain, DomainError::Internal { .. }));
}
