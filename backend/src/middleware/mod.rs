//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! tracing, rate limiting and response hardening.

pub mod rate_limit;
pub mod security_headers;
pub mod trace;

pub use rate_limit::{ClientRateLimiter, RateLimit};
pub use trace::Trace;
