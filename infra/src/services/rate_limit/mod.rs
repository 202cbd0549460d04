//! Sliding-window rate limiting on Redis sorted sets

pub mod window_store;

#[cfg(test)]
mod tests;

pub use window_store::{RedisWindowRepository, SLIDING_WINDOW_SCRIPT};
