pub mod auth;

pub use auth::{
    LoginRequest, LogoutRequest, LogoutResponse, RefreshTokenRequest, TokenResponse, VerifyResponse,
};
