//! Read-through weather lookup.
//!
//! The service derives the cache key, serves cached payloads when present and
//! otherwise fetches, transforms and stores a fresh payload. Every failure is
//! classified into a [`WeatherLookupError`] and logged once with the key and
//! the stage that failed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, warn};

use crate::domain::ports::{
    LookupMetrics, NoOpLookupMetrics, WeatherCache, WeatherCacheKey, WeatherLookup, WeatherSource,
    WeatherSourceError,
};
use crate::domain::{
    CityQuery, DataSource, LookupStage, RawWeatherPayload, WeatherEnvelope, WeatherLookupError,
    WeatherTransformer,
};

/// Default lifetime of a cached payload: twelve hours.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(43_200);

/// What to do when storing a freshly fetched payload fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheWritePolicy {
    /// Fail the lookup with [`WeatherLookupError::CacheUnavailable`].
    #[default]
    Required,
    /// Log a warning and return the fetched data anyway.
    BestEffort,
}

/// Tunables for [`WeatherLookupService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherLookupConfig {
    /// Time-to-live applied to every cache write.
    pub cache_ttl: Duration,
    /// Handling of cache write failures.
    pub cache_write_policy: CacheWritePolicy,
}

impl Default for WeatherLookupConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_write_policy: CacheWritePolicy::default(),
        }
    }
}

/// Port bundle required by the lookup service.
pub struct WeatherLookupPorts {
    /// Cache store adapter.
    pub cache: Arc<dyn WeatherCache>,
    /// Upstream provider adapter.
    pub source: Arc<dyn WeatherSource>,
    /// Lookup metrics adapter.
    pub metrics: Arc<dyn LookupMetrics>,
}

impl WeatherLookupPorts {
    /// Bundle the cache and provider adapters with no-op metrics.
    pub fn new(cache: Arc<dyn WeatherCache>, source: Arc<dyn WeatherSource>) -> Self {
        Self {
            cache,
            source,
            metrics: Arc::new(NoOpLookupMetrics),
        }
    }

    /// Replace the metrics adapter.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn LookupMetrics>) -> Self {
        self.metrics = metrics;
        self
    }
}

/// Domain service implementing [`WeatherLookup`] as a cache-aside read.
///
/// Concurrent misses for the same city each call the provider; the last
/// write wins.
#[derive(Clone)]
pub struct WeatherLookupService {
    cache: Arc<dyn WeatherCache>,
    source: Arc<dyn WeatherSource>,
    metrics: Arc<dyn LookupMetrics>,
    clock: Arc<dyn Clock>,
    config: WeatherLookupConfig,
}

impl WeatherLookupService {
    /// Build the service from its ports.
    /// ```rust,ignore
    /// let service = WeatherLookupService::new(ports, clock, WeatherLookupConfig::default());
    /// ```
    pub fn new(
        ports: WeatherLookupPorts,
        clock: Arc<dyn Clock>,
        config: WeatherLookupConfig,
    ) -> Self {
        Self {
            cache: ports.cache,
            source: ports.source,
            metrics: ports.metrics,
            clock,
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> WeatherLookupConfig {
        self.config
    }

    fn envelope(
        &self,
        source: DataSource,
        payload: &RawWeatherPayload,
        key: &WeatherCacheKey,
    ) -> Result<WeatherEnvelope, WeatherLookupError> {
        let data = WeatherTransformer::transform(payload)
            .inspect_err(|err| log_failure(key, err))?;
        Ok(WeatherEnvelope::success(source, data, self.clock.utc()))
    }

    async fn serve_miss(
        &self,
        city: &CityQuery,
        key: &WeatherCacheKey,
    ) -> Result<WeatherEnvelope, WeatherLookupError> {
        let payload = match self.source.fetch(city.as_str()).await {
            Ok(payload) => payload,
            Err(source_error) => {
                self.record_upstream_failure(&source_error).await;
                let err = WeatherLookupError::from(source_error);
                log_failure(key, &err);
                return Err(err);
            }
        };

        // Transform first so a malformed payload never reaches the cache.
        let envelope = self.envelope(DataSource::Api, &payload, key)?;

        if let Err(cache_error) = self
            .cache
            .set(key, &payload, self.config.cache_ttl)
            .await
        {
            let err = WeatherLookupError::from_cache(LookupStage::CacheWrite, &cache_error);
            match self.config.cache_write_policy {
                CacheWritePolicy::Required => {
                    log_failure(key, &err);
                    return Err(err);
                }
                CacheWritePolicy::BestEffort => {
                    warn!(
                        key = %key,
                        stage = %LookupStage::CacheWrite,
                        error = %err,
                        "cache write failed; returning uncached data"
                    );
                }
            }
        }

        Ok(envelope)
    }

    async fn record_upstream_failure(&self, error: &WeatherSourceError) {
        let kind = match error {
            WeatherSourceError::Http { .. } => "http",
            WeatherSourceError::Unreachable { .. } => "unreachable",
            WeatherSourceError::Client { .. } => "client",
            WeatherSourceError::Decode { .. } => "decode",
        };
        if let Err(metrics_error) = self.metrics.record_upstream_failure(kind).await {
            warn!(error = %metrics_error, "failed to record upstream failure metric");
        }
    }
}

fn derive_key(city: &CityQuery) -> Result<WeatherCacheKey, WeatherLookupError> {
    WeatherCacheKey::for_city(city.as_str())
        .map_err(|err| WeatherLookupError::invalid_input(err.to_string()))
        .inspect_err(|err| {
            warn!(city = %city, stage = %err.stage(), error = %err, "rejected weather lookup");
        })
}

fn log_failure(key: &WeatherCacheKey, err: &WeatherLookupError) {
    error!(key = %key, stage = %err.stage(), error = %err, "weather lookup failed");
}

#[async_trait]
impl WeatherLookup for WeatherLookupService {
    async fn lookup(&self, city: &CityQuery) -> Result<WeatherEnvelope, WeatherLookupError> {
        let key = derive_key(city)?;

        let cached = self.cache.get(&key).await.map_err(|cache_error| {
            let err = WeatherLookupError::from_cache(LookupStage::CacheRead, &cache_error);
            log_failure(&key, &err);
            err
        })?;

        match cached {
            Some(payload) => {
                debug!(key = %key, source = %DataSource::Cache, "weather cache hit");
                if let Err(metrics_error) = self.metrics.record_cache_hit().await {
                    warn!(error = %metrics_error, "failed to record cache hit metric");
                }
                self.envelope(DataSource::Cache, &payload, &key)
            }
            None => {
                debug!(key = %key, source = %DataSource::Api, "weather cache miss");
                if let Err(metrics_error) = self.metrics.record_cache_miss().await {
                    warn!(error = %metrics_error, "failed to record cache miss metric");
                }
                self.serve_miss(city, &key).await
            }
        }
    }

    async fn invalidate(&self, city: &CityQuery) -> Result<(), WeatherLookupError> {
        let key = derive_key(city)?;
        self.cache.delete(&key).await.map_err(|cache_error| {
            let err = WeatherLookupError::from_cache(LookupStage::CacheDelete, &cache_error);
            log_failure(&key, &err);
            err
        })?;
        debug!(key = %key, "weather cache entry invalidated");
        Ok(())
    }
}

#[cfg(test)]
#[path = "weather_lookup_service_tests.rs"]
mod tests;
