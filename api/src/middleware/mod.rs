pub mod auth;
pub mod rate_limit;

pub use auth::{AuthContext, JwtAuth};
pub use rate_limit::RateLimitGate;
