//! Domain port surface for recording weather lookup outcomes.
//!
//! Recording failures never change a lookup result; the service logs them
//! and carries on.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when recording lookup metrics.
    pub enum LookupMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "lookup metrics exporter failed: {message}",
    }
}

/// Metrics recording port for the read-through lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LookupMetrics: Send + Sync {
    /// Record a lookup served from the cache.
    async fn record_cache_hit(&self) -> Result<(), LookupMetricsError>;

    /// Record a lookup that had to call the provider.
    async fn record_cache_miss(&self) -> Result<(), LookupMetricsError>;

    /// Record a provider call that failed, labelled by failure kind.
    async fn record_upstream_failure(&self, kind: &str) -> Result<(), LookupMetricsError>;
}

/// No-op implementation for when metrics are disabled or in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpLookupMetrics;

#[async_trait]
impl LookupMetrics for NoOpLookupMetrics {
    async fn record_cache_hit(&self) -> Result<(), LookupMetricsError> {
        Ok(())
    }

    async fn record_cache_miss(&self) -> Result<(), LookupMetricsError> {
        Ok(())
    }

    async fn record_upstream_failure(&self, _kind: &str) -> Result<(), LookupMetricsError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Ensures NoOpLookupMetrics accepts every event.
    use super::*;

    #[tokio::test]
    async fn noop_accepts_all_events() {
        let metrics = NoOpLookupMetrics;
        assert!(metrics.record_cache_hit().await.is_ok());
        assert!(metrics.record_cache_miss().await.is_ok());
        assert!(metrics.record_upstream_failure("http").await.is_ok());
    }

    #[test]
    fn error_constructor_accepts_str() {
        let err = LookupMetricsError::export("registry closed");
        assert_eq!(
            err.to_string(),
            "lookup metrics exporter failed: registry closed"
        );
    }
}
