//! Read-through caching weather gateway.
//!
//! The crate follows a hexagonal layout: [`domain`] holds the lookup
//! orchestration and its ports, [`outbound`] the Redis, in-memory, Visual
//! Crossing and Prometheus adapters, and [`inbound`] the actix-web handlers.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
