//! Outbound adapters for metrics exporting.
//!
//! Prometheus-backed implementations of domain metrics ports, compiled only
//! with the `metrics` feature.

mod prometheus_lookup;

pub use prometheus_lookup::PrometheusLookupMetrics;
