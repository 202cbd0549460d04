//! Cache module for Redis-backed stores
//!
//! The Redis client plus the revocation and identity stores built on it.

pub mod identity_cache;
pub mod redis_client;
pub mod revocation_store;

#[cfg(test)]
mod tests;

pub use identity_cache::{profile_key, RedisIdentityCache};
pub use redis_client::RedisClient;
pub use revocation_store::RedisRevocationRepository;

// Re-export commonly used types
pub use sso_shared::CacheConfig;
