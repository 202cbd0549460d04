//! Distributed sliding-window rate limiting
//!
//! - `policy` - Route to quota lookup table with a process-wide default
//! - `key` - Store key derivation from client identity and route
//! - `limiter` - Admission decision against a [`WindowRepository`](crate::repositories::WindowRepository)
//! - `gate` - Per-request orchestration with fail-open/fail-closed handling

mod gate;
mod key;
mod limiter;
mod policy;

#[cfg(test)]
mod tests;

pub use gate::{GateDecision, RequestGate, RequestMeta};
pub use key::{normalize_identity, rate_limit_key, split_rate_limit_key, KEY_SEPARATOR, RATE_LIMIT_PREFIX};
pub use limiter::SlidingWindowLimiter;
pub use policy::{Limit, LimitPolicy};
