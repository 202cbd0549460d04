//! Login, refresh rotation and logout over the token manager and revocation ledger

mod service;


pub use service::SessionService;
