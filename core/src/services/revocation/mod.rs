//! Revocation ledger for refresh tokens

mod ledger;

pub use ledger::{revocation_key, RevocationLedger, REVOKED_KEY_PREFIX};
