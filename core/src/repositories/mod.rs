//! Repository traits (ports) and their in-memory implementations.

pub mod identity;
pub mod rate_window;
pub mod revocation;

pub use identity::{IdentityProvider, InMemoryIdentityProvider};
pub use rate_window::{MemoryWindowRepository, WindowRepository};
pub use revocation::{MemoryRevocationRepository, RevocationRepository};
