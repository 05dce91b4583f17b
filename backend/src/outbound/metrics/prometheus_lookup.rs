//! Prometheus adapter for weather lookup metrics.
//!
//! Counters are registered with the registry that backs the `/metrics`
//! endpoint.

use async_trait::async_trait;
use prometheus::{CounterVec, IntCounter, Opts, Registry};

use crate::domain::ports::{LookupMetrics, LookupMetricsError};

/// Prometheus-backed lookup metrics recorder.
///
/// # Metric Specification
///
/// - `weather_cache_lookups_total{result="hit"|"miss"}`: counter of lookups by
///   cache outcome.
/// - `weather_upstream_failures_total{kind}`: counter of failed provider
///   calls, `kind` being `http`, `unreachable`, `client` or `decode`.
pub struct PrometheusLookupMetrics {
    cache_hits: IntCounter,
    cache_misses: IntCounter,
    upstream_failures: CounterVec,
}

impl PrometheusLookupMetrics {
    /// Create and register metrics with the given registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric cannot be registered (e.g., if a metric
    /// with the same name already exists in the registry).
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let lookups = prometheus::IntCounterVec::new(
            Opts::new(
                "weather_cache_lookups_total",
                "Weather lookups by cache outcome",
            ),
            &["result"],
        )?;
        let upstream_failures = CounterVec::new(
            Opts::new(
                "weather_upstream_failures_total",
                "Failed weather provider calls by failure kind",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(lookups.clone()))?;
        registry.register(Box::new(upstream_failures.clone()))?;

        Ok(Self {
            cache_hits: lookups.with_label_values(&["hit"]),
            cache_misses: lookups.with_label_values(&["miss"]),
            upstream_failures,
        })
    }
}

#[async_trait]
impl LookupMetrics for PrometheusLookupMetrics {
    async fn record_cache_hit(&self) -> Result<(), LookupMetricsError> {
        self.cache_hits.inc();
        Ok(())
    }

    async fn record_cache_miss(&self) -> Result<(), LookupMetricsError> {
        self.cache_misses.inc();
        Ok(())
    }

    async fn record_upstream_failure(&self, kind: &str) -> Result<(), LookupMetricsError> {
        self.upstream_failures
            .get_metric_with_label_values(&[kind])
            .map_err(|err| LookupMetricsError::export(err.to_string()))?
            .inc();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_metrics_with_registry() {
        let registry = Registry::new();
        let _metrics = PrometheusLookupMetrics::new(&registry)
            .expect("metric registration should succeed");

        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.name().to_owned())
            .collect();
        assert!(names.iter().any(|name| name == "weather_cache_lookups_total"));
        assert!(
            names
                .iter()
                .any(|name| name == "weather_upstream_failures_total")
        );
    }

    #[test]
    fn double_registration_fails() {
        let registry = Registry::new();
        PrometheusLookupMetrics::new(&registry).expect("first registration");
        assert!(PrometheusLookupMetrics::new(&registry).is_err());
    }

    #[tokio::test]
    async fn hits_and_misses_increment_separately() {
        let registry = Registry::new();
        let metrics =
            PrometheusLookupMetrics::new(&registry).expect("metric registration should succeed");

        metrics.record_cache_hit().await.expect("hit recorded");
        metrics.record_cache_miss().await.expect("miss recorded");
        metrics.record_cache_miss().await.expect("miss recorded");

        assert_eq!(metrics.cache_hits.get(), 1);
        assert_eq!(metrics.cache_misses.get(), 2);
    }

    #[tokio::test]
    async fn upstream_failures_are_labelled_by_kind() {
        let registry = Registry::new();
        let metrics =
            PrometheusLookupMetrics::new(&registry).expect("metric registration should succeed");

        metrics
            .record_upstream_failure("unreachable")
            .await
            .expect("failure recorded");

        let counter = metrics.upstream_failures.with_label_values(&["unreachable"]);
        assert_eq!(counter.get() as u64, 1);
    }
}
