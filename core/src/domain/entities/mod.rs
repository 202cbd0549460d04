//! Domain entities representing credentials and their claims.

pub mod token;


pub use token::{AccessClaims, RefreshClaims, TokenIdentity, TokenPair};
