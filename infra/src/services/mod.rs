//! Redis-backed infrastructure services

pub mod rate_limit;

pub use rate_limit::RedisWindowRepository;
