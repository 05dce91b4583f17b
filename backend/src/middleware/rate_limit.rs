//! Per-client rate limiting keyed on the client IP address.
//!
//! A [`ClientRateLimiter`] grants each client `max_requests` per window using
//! a keyed `governor` limiter: a client may spend the whole allowance at once
//! and regains one request every `window / max_requests`, so an idle client
//! is back to a full allowance after one window. [`RateLimit`] wraps an app
//! or scope with a shared limiter and answers `429 Too Many Requests` once a
//! client runs dry.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::RETRY_AFTER;
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use serde::Serialize;
use tracing::warn;

/// Client key used when the peer address is unavailable.
const UNKNOWN_CLIENT: &str = "unknown";
/// Number of tracked clients above which idle ones are forgotten.
const PRUNE_THRESHOLD: usize = 1024;

/// Outcome of counting one request against a client's allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// The request may proceed.
    Allowed,
    /// The client has exhausted its allowance.
    Limited {
        /// Time until the client may send another request.
        retry_after: Duration,
    },
}

/// Quota of `max_requests` per `window`. A zero limit is treated as one.
fn window_quota(max_requests: u32, window: Duration) -> Quota {
    let burst = NonZeroU32::new(max_requests).unwrap_or(NonZeroU32::MIN);
    Quota::with_period(window / burst.get())
        .map_or_else(|| Quota::per_second(burst), |quota| quota.allow_burst(burst))
}

/// Request limiter shared by every worker.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use weather_gateway::middleware::rate_limit::{ClientRateLimiter, RateDecision};
///
/// let limiter = ClientRateLimiter::new(1, Duration::from_secs(60));
/// assert_eq!(limiter.check("10.0.0.1"), RateDecision::Allowed);
/// assert!(matches!(limiter.check("10.0.0.1"), RateDecision::Limited { .. }));
/// ```
pub struct ClientRateLimiter<C: Clock = DefaultClock> {
    limiter: RateLimiter<String, DefaultKeyedStateStore<String>, C, NoOpMiddleware<C::Instant>>,
    clock: C,
}

impl ClientRateLimiter {
    /// Limiter reading the monotonic system clock.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self::with_clock(max_requests, window, DefaultClock::default())
    }
}

impl<C: Clock> ClientRateLimiter<C> {
    pub fn with_clock(max_requests: u32, window: Duration, clock: C) -> Self {
        let limiter = RateLimiter::dashmap_with_clock(window_quota(max_requests, window), &clock);
        Self { limiter, clock }
    }

    /// Count one request for `client` and report whether it may proceed.
    pub fn check(&self, client: &str) -> RateDecision {
        if self.limiter.len() > PRUNE_THRESHOLD {
            self.limiter.retain_recent();
        }
        match self.limiter.check_key(&client.to_owned()) {
            Ok(()) => RateDecision::Allowed,
            Err(not_until) => RateDecision::Limited {
                retry_after: not_until.wait_time_from(self.clock.now()),
            },
        }
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RateLimitedBody {
    status: &'static str,
    status_code: u16,
    error: &'static str,
    message: &'static str,
}

fn too_many_requests(retry_after: Duration) -> HttpResponse {
    // Round up so clients never retry early.
    let mut seconds = retry_after.as_secs();
    if retry_after.subsec_nanos() > 0 || seconds == 0 {
        seconds += 1;
    }
    HttpResponse::TooManyRequests()
        .insert_header((RETRY_AFTER, seconds.to_string()))
        .json(RateLimitedBody {
            status: "fail",
            status_code: 429,
            error: "Too many requests",
            message: "Rate limit exceeded",
        })
}

fn client_key(req: &ServiceRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_owned())
}

/// Middleware applying a [`ClientRateLimiter`].
///
/// Build the limiter once, outside the `HttpServer` factory, so every worker
/// counts against the same allowances.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use actix_web::App;
/// use weather_gateway::middleware::rate_limit::{ClientRateLimiter, RateLimit};
///
/// let limiter = Arc::new(ClientRateLimiter::new(100, Duration::from_secs(900)));
/// let _app = App::new().wrap(RateLimit::new(limiter));
/// ```
pub struct RateLimit<C: Clock = DefaultClock> {
    limiter: Arc<ClientRateLimiter<C>>,
}

impl<C: Clock> RateLimit<C> {
    pub fn new(limiter: Arc<ClientRateLimiter<C>>) -> Self {
        Self { limiter }
    }
}

impl<C: Clock> Clone for RateLimit<C> {
    fn clone(&self) -> Self {
        Self {
            limiter: Arc::clone(&self.limiter),
        }
    }
}

impl<S, B, C> Transform<S, ServiceRequest> for RateLimit<C>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
    C: Clock + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S, C>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            limiter: Arc::clone(&self.limiter),
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S, C: Clock = DefaultClock> {
    service: S,
    limiter: Arc<ClientRateLimiter<C>>,
}

impl<S, B, C> Service<ServiceRequest> for RateLimitMiddleware<S, C>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
    C: Clock + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client = client_key(&req);
        match self.limiter.check(&client) {
            RateDecision::Allowed => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            RateDecision::Limited { retry_after } => {
                warn!(client = %client, path = req.path(), "rate limit exceeded");
                let response = req
                    .into_response(too_many_requests(retry_after))
                    .map_into_right_body();
                Box::pin(ready(Ok(response)))
            }
        }
    }
}
