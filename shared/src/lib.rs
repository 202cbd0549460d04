//! Shared configuration and common types for the SSO trust services
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Error response structures and error codes
//! - Health check response types
//! - Logging initialisation

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, ConfigError, Environment, FailMode, JwtConfig, LogFormat,
    LoggingConfig, RateLimitConfig, RouteLimit, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{HealthResponse, HealthStatus, ServiceHealth};
