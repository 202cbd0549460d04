//! Shared verification path for the manager and the validator

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::errors::TokenError;

/// Algorithms a token may declare in its header
///
/// Everything else, including `none`, the HMAC family, ECDSA and RSA-PSS, is
/// rejected before the signature is looked at.
pub const ACCEPTED_ALGORITHMS: &[&str] = &["RS256", "RS384", "RS512"];

/// Public-key verifier shared by [`TokenManager`](super::TokenManager) and
/// [`TokenValidator`](super::TokenValidator)
#[derive(Clone)]
pub(crate) struct TokenVerifier {
    decoding_key: Arc<DecodingKey>,
}

impl TokenVerifier {
    pub(crate) fn new(decoding_key: DecodingKey) -> Self {
        Self {
            decoding_key: Arc::new(decoding_key),
        }
    }

    /// Check the declared algorithm, then the signature and `exp`
    pub(crate) fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<C, TokenError> {
        let algorithm = declared_algorithm(token).map_err(|err| {
            log_rejection(&err);
            err
        })?;

        let mut validation = Validation::new(algorithm);
        validation.algorithms = vec![Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_aud = false;

        let result = decode::<C>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                ErrorKind::InvalidSignature | ErrorKind::ImmatureSignature => {
                    TokenError::TokenInvalid
                }
                ErrorKind::InvalidAlgorithm => TokenError::SigningMethodMismatch {
                    algorithm: format!("{:?}", algorithm),
                },
                _ => TokenError::parse(e.to_string()),
            });

        if let Err(err) = &result {
            log_rejection(err);
        }
        result
    }
}

fn log_rejection(err: &TokenError) {
    if err.is_security_event() {
        warn!(error = %err, "rejected tampered or malformed token");
    } else {
        debug!(error = %err, "rejected token");
    }
}

/// Reads `alg` from the raw header segment without trusting the rest of the token
fn declared_algorithm(token: &str) -> Result<Algorithm, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 || segments[0].is_empty() {
        return Err(TokenError::parse("token must have three segments"));
    }
    let header_segment = segments[0];

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header_segment)
        .map_err(|e| TokenError::parse(format!("header is not base64url: {}", e)))?;
    let header: serde_json::Value = serde_json::from_slice(&header_bytes)
        .map_err(|e| TokenError::parse(format!("header is not JSON: {}", e)))?;

    let alg = header
        .get("alg")
        .and_then(|value| value.as_str())
        .ok_or_else(|| TokenError::parse("header has no alg"))?;

    match alg {
        "RS256" => Ok(Algorithm::RS256),
        "RS384" => Ok(Algorithm::RS384),
        "RS512" => Ok(Algorithm::RS512),
        other => Err(TokenError::SigningMethodMismatch {
            algorithm: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_header(header: &str) -> String {
        format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(r#"{"user_id":1}"#),
            "c2ln"
        )
    }

    #[test]
    fn test_declared_algorithm_accepts_rsa_family() {
        for alg in ACCEPTED_ALGORITHMS {
            let token = token_with_header(&format!(r#"{{"alg":"{}","typ":"JWT"}}"#, alg));
            assert!(declared_algorithm(&token).is_ok(), "{} should be accepted", alg);
        }
    }

    #[test]
    fn test_declared_algorithm_rejects_other_families() {
        for alg in ["none", "HS256", "HS512", "ES256", "PS256", "EdDSA"] {
            let token = token_with_header(&format!(r#"{{"alg":"{}"}}"#, alg));
            assert_eq!(
                declared_algorithm(&token),
                Err(TokenError::SigningMethodMismatch {
                    algorithm: alg.to_string()
                })
            );
        }
    }

    #[test]
    fn test_declared_algorithm_rejects_malformed_headers() {
        assert!(matches!(
            declared_algorithm(""),
            Err(TokenError::TokenParse { .. })
        ));
        assert!(matches!(
            declared_algorithm("not-base64!.payload.sig"),
            Err(TokenError::TokenParse { .. })
        ));
        assert!(matches!(
            declared_algorithm(&token_with_header(r#"{"typ":"JWT"}"#)),
            Err(TokenError::TokenParse { .. })
        ));
        assert!(matches!(
            declared_algorithm("eyJhbGciOiJSUzI1NiJ9.only-two"),
            Err(TokenError::TokenParse { .. })
        ));
    }
}
