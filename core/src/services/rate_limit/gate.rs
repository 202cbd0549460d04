//! Per-request admission gate

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use sso_shared::FailMode;
use tracing::{error, info, warn};

use crate::errors::{DomainError, DomainResult};
use crate::repositories::WindowRepository;

use super::limiter::SlidingWindowLimiter;
use super::policy::{Limit, LimitPolicy};

/// Transport metadata the gate needs from an inbound call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    /// Fully-qualified route name
    pub route: String,
    /// Raw `X-Forwarded-For` header value
    pub forwarded_for: Option<String>,
    /// Raw `X-Real-IP` header value
    pub real_ip: Option<String>,
    /// Transport-level peer address, with or without port
    pub peer_addr: Option<String>,
}

impl RequestMeta {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            ..Default::default()
        }
    }

    pub fn with_peer(mut self, peer_addr: impl Into<String>) -> Self {
        self.peer_addr = Some(peer_addr.into());
        self
    }

    pub fn with_forwarded_for(mut self, value: impl Into<String>) -> Self {
        self.forwarded_for = Some(value.into());
        self
    }

    pub fn with_real_ip(mut self, value: impl Into<String>) -> Self {
        self.real_ip = Some(value.into());
        self
    }
}

/// Outcome of the gate for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Quota exhausted
    Deny { limit: Limit },
    /// Store failed and the gate is configured to fail closed
    Unavailable,
}

/// Resolves identity and quota for a request and consults the limiter
pub struct RequestGate<W: WindowRepository> {
    limiter: SlidingWindowLimiter<W>,
    policy: Arc<LimitPolicy>,
    fail_mode: FailMode,
    trust_proxy: bool,
}

impl<W: WindowRepository> RequestGate<W> {
    pub fn new(
        limiter: SlidingWindowLimiter<W>,
        policy: Arc<LimitPolicy>,
        fail_mode: FailMode,
        trust_proxy: bool,
    ) -> Self {
        info!(
            fail_mode = %fail_mode,
            trust_proxy,
            default_limit = policy.default_limit().count(),
            default_window_ms = policy.default_limit().window().as_millis() as u64,
            route_overrides = policy.routes().len(),
            "rate limiter configured"
        );
        if trust_proxy {
            warn!("forwarded client addresses are trusted; only enable behind a reverse proxy");
        }

        Self {
            limiter,
            policy,
            fail_mode,
            trust_proxy,
        }
    }

    pub fn policy(&self) -> &Arc<LimitPolicy> {
        &self.policy
    }

    pub fn fail_mode(&self) -> FailMode {
        self.fail_mode
    }

    /// Client address for rate limiting
    ///
    /// Forwarded headers are consulted only when the proxy is trusted, and a
    /// value that is not an IP address is ignored. With no usable address the
    /// extraction fails instead of guessing.
    pub fn client_identity(&self, meta: &RequestMeta) -> DomainResult<IpAddr> {
        if self.trust_proxy {
            let forwarded = meta
                .forwarded_for
                .as_deref()
                .and_then(|value| value.split(',').next())
                .and_then(parse_address);
            if let Some(ip) = forwarded {
                return Ok(ip);
            }
            if let Some(ip) = meta.real_ip.as_deref().and_then(parse_address) {
                return Ok(ip);
            }
        }

        meta.peer_addr
            .as_deref()
            .and_then(parse_address)
            .ok_or_else(|| DomainError::Internal {
                message: "cannot determine client address".to_string(),
            })
    }

    /// Decide whether the request may proceed
    ///
    /// # Errors
    ///
    /// Only when the client address cannot be determined. Store failures are
    /// folded into the decision according to the fail mode.
    pub async fn check(&self, meta: &RequestMeta) -> DomainResult<GateDecision> {
        let ip = self.client_identity(meta)?.to_string();
        let limit = self.policy.resolve(&meta.route);

        match self.limiter.allow(&ip, &meta.route, limit).await {
            Ok(true) => Ok(GateDecision::Allow),
            Ok(false) => Ok(GateDecision::Deny { limit }),
            Err(err) => match self.fail_mode {
                FailMode::Open => {
                    warn!(error = %err, ip = %ip, route = %meta.route, "rate limiter unavailable, failing open");
                    Ok(GateDecision::Allow)
                }
                FailMode::Closed => {
                    error!(error = %err, ip = %ip, route = %meta.route, "rate limiter unavailable, failing closed");
                    Ok(GateDecision::Unavailable)
                }
            },
        }
    }
}

fn parse_address(value: &str) -> Option<IpAddr> {
    let value = value.trim();
    value
        .parse::<IpAddr>()
        .ok()
        .or_else(|| value.parse::<SocketAddr>().ok().map(|addr| addr.ip()))
}
