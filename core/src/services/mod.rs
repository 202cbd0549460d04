//! Business services containing the credential, revocation and rate-limit logic.

pub mod rate_limit;
pub mod revocation;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use rate_limit::{
    GateDecision, Limit, LimitPolicy, RequestGate, RequestMeta, SlidingWindowLimiter,
};
pub use revocation::RevocationLedger;
pub use session::SessionService;
pub use token::{Rs256KeyManager, TokenManager, TokenManagerConfig, TokenValidator};
