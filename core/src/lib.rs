//! # SSO Core
//!
//! Trust infrastructure for the single sign-on service: RS256 credential
//! issuance and verification, the refresh-token revocation ledger, and the
//! sliding-window rate limiter with its request gate. Storage is reached only
//! through the repository traits; Redis adapters live in `sso_infra`.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{AccessClaims, RefreshClaims, TokenIdentity, TokenPair};
pub use errors::{DomainError, DomainResult, TokenError};
pub use repositories::{
    IdentityProvider, InMemoryIdentityProvider, MemoryRevocationRepository,
    MemoryWindowRepository, RevocationRepository, WindowRepository,
};
pub use services::{
    GateDecision, Limit, LimitPolicy, RequestGate, RequestMeta, RevocationLedger,
    Rs256KeyManager, SessionService, SlidingWindowLimiter, TokenManager, TokenManagerConfig,
    TokenValidator,
};
