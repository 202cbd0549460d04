//! Authentication route handlers
//!
//! - Login for identities authenticated upstream
//! - Token refresh (rotation of the refresh token)
//! - Logout (revocation of the refresh token)
//! - Access token introspection

pub mod login;
pub mod logout;
pub mod refresh;
pub mod verify;
