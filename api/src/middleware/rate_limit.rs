//! Rate limiting middleware for API endpoints
//!
//! Every request passes through the [`RequestGate`] before it reaches a
//! handler. The gate identifies the caller by IP address and consults the
//! shared sliding-window limiter for the request path.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};
use tracing::{debug, warn};

use sso_core::{GateDecision, RequestMeta};

use crate::app::SharedGate;
use crate::handlers::ApiError;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Rate limiter middleware factory
///
/// A gate-less instance passes every request through untouched.
#[derive(Clone)]
pub struct RateLimitGate {
    gate: Option<Arc<SharedGate>>,
}

impl RateLimitGate {
    pub fn new(gate: Arc<SharedGate>) -> Self {
        Self { gate: Some(gate) }
    }

    /// Pass-through instance for deployments with rate limiting switched off
    pub fn disabled() -> Self {
        Self { gate: None }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitGateMiddleware {
            service: Rc::new(service),
            gate: self.gate.clone(),
        }))
    }
}

/// Rate limiter middleware service
pub struct RateLimitGateMiddleware<S> {
    service: Rc<S>,
    gate: Option<Arc<SharedGate>>,
}

impl<S, B> Service<ServiceRequest> for RateLimitGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let gate = self.gate.clone();

        Box::pin(async move {
            let Some(gate) = gate else {
                return service.call(req).await.map(ServiceResponse::map_into_left_body);
            };

            let meta = request_meta(&req);
            let rejection = match gate.check(&meta).await {
                Ok(GateDecision::Allow) => {
                    return service.call(req).await.map(ServiceResponse::map_into_left_body);
                }
                Ok(GateDecision::Deny { limit }) => {
                    debug!(route = %meta.route, "request rejected by rate limiter");
                    ApiError::rate_limited(limit)
                }
                Ok(GateDecision::Unavailable) => {
                    warn!(route = %meta.route, "rate limiter unavailable, request refused");
                    ApiError::unavailable()
                }
                Err(e) => ApiError::from(e),
            };

            Ok(req
                .into_response(rejection.error_response())
                .map_into_right_body())
        })
    }
}

/// Transport metadata the gate resolves the caller from
///
/// The route is the percent-decoded path the router matches on, so every
/// spelling of one resource shares a single quota.
pub fn request_meta(req: &ServiceRequest) -> RequestMeta {
    let mut meta = RequestMeta::new(req.match_info().as_str());

    if let Some(peer) = req.peer_addr() {
        meta = meta.with_peer(peer.to_string());
    }
    if let Some(value) = header_value(req, X_FORWARDED_FOR) {
        meta = meta.with_forwarded_for(value);
    }
    if let Some(value) = header_value(req, X_REAL_IP) {
        meta = meta.with_real_ip(value);
    }

    meta
}

fn header_value(req: &ServiceRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
