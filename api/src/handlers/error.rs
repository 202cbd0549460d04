//! Mapping of domain failures onto HTTP responses

use std::fmt;

use actix_web::{
    error::JsonPayloadError,
    http::{header, StatusCode},
    HttpRequest, HttpResponse, ResponseError,
};
use tracing::{debug, error, warn};

use sso_core::{DomainError, Limit, TokenError};
use sso_shared::{error_codes, ErrorResponse};

/// Every credential failure is reported with this one message
pub const AUTHENTICATION_FAILED: &str = "authentication failed";

/// Error returned by handlers and middleware
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
    retry_after: Option<u64>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse::new(code, message),
            retry_after: None,
        }
    }

    /// Generic 401 that does not say which check failed
    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            error_codes::UNAUTHORIZED,
            AUTHENTICATION_FAILED,
        )
    }

    /// 429 carrying the window length as `Retry-After`
    pub fn rate_limited(limit: Limit) -> Self {
        let retry_after = retry_after_secs(limit);
        let mut err = Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            error_codes::RATE_LIMIT_EXCEEDED,
            "Too many requests",
        );
        err.body = err
            .body
            .add_detail("limit", limit.count())
            .add_detail("retry_after_seconds", retry_after);
        err.retry_after = Some(retry_after);
        err
    }

    pub fn unavailable() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::SERVICE_UNAVAILABLE,
            "Service temporarily unavailable",
        )
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            "An internal error occurred",
        )
    }

    pub fn not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            error_codes::NOT_FOUND,
            "The requested resource was not found",
        )
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::BAD_REQUEST, message)
    }

    pub fn body(&self) -> &ErrorResponse {
        &self.body
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.body.error, self.body.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status);
        if let Some(secs) = self.retry_after {
            builder.insert_header((header::RETRY_AFTER, secs.to_string()));
        }
        builder.json(&self.body)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Token(TokenError::KeyLoad { .. } | TokenError::SigningFailed { .. }) => {
                error!(error = %err, "credential signing unavailable");
                Self::internal()
            }
            DomainError::Token(TokenError::InvalidData { reason }) => {
                warn!(reason = %reason, "identity rejected for token issuance");
                Self::new(
                    StatusCode::BAD_REQUEST,
                    error_codes::VALIDATION_ERROR,
                    reason,
                )
            }
            DomainError::Token(TokenError::TokenAlreadyExpired) => {
                warn!("revocation requested for a token past its expiry");
                Self::unauthorized()
            }
            DomainError::Token(token_err) => {
                debug!(error = %token_err, "token rejected");
                Self::unauthorized()
            }
            DomainError::Unauthorized => Self::unauthorized(),
            DomainError::Validation { message } => {
                Self::new(StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR, message)
            }
            DomainError::NotFound { resource } => Self::new(
                StatusCode::NOT_FOUND,
                error_codes::NOT_FOUND,
                format!("{} not found", resource),
            ),
            DomainError::StoreUnavailable { message } => {
                error!(error = %message, "backing store unavailable");
                Self::unavailable()
            }
            DomainError::Internal { message } => {
                error!(error = %message, "internal error");
                Self::internal()
            }
        }
    }
}

/// Malformed JSON bodies become 400 responses in the common error shape
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected request body");
    ApiError::bad_request(format!("Invalid request body: {}", err)).into()
}

/// Whole seconds until a full window has passed, at least one
fn retry_after_secs(limit: Limit) -> u64 {
    let millis = u64::try_from(limit.window().as_millis()).unwrap_or(u64::MAX);
    millis.div_ceil(1000).max(1)
}
