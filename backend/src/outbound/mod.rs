//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **cache**: Redis-backed and in-process weather caches
//! - **visual_crossing**: reqwest client for the weather provider
//! - **metrics**: Prometheus-backed lookup metrics (feature-gated)
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no lookup logic.

pub mod cache;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod visual_crossing;
