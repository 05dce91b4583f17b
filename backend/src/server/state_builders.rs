//! Builders wiring the cache, upstream and metrics adapters into the lookup
//! service.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use weather_gateway::domain::ports::{WeatherCache, WeatherLookup, WeatherSource};
use weather_gateway::domain::{WeatherLookupPorts, WeatherLookupService};
use weather_gateway::outbound::cache::{
    InMemoryWeatherCache, RedisPoolSettings, RedisWeatherCache, connect_redis_pool,
};
use weather_gateway::outbound::visual_crossing::{VisualCrossingSettings, VisualCrossingSource};

#[cfg(feature = "metrics")]
use weather_gateway::outbound::metrics::PrometheusLookupMetrics;

use super::GatewaySettings;

/// Build the cache store: Redis when a URL is configured, otherwise an
/// in-process map.
///
/// # Errors
/// Returns [`std::io::Error`] when the Redis pool cannot be built.
async fn build_cache(
    settings: &GatewaySettings,
    clock: Arc<dyn Clock>,
) -> std::io::Result<Arc<dyn WeatherCache>> {
    match settings.redis_url() {
        Some(url) => {
            let pool_settings = RedisPoolSettings {
                max_size: settings.redis_pool_size(),
                ..RedisPoolSettings::default()
            };
            let pool = connect_redis_pool(url, pool_settings)
                .await
                .map_err(|e| std::io::Error::other(format!("redis pool: {e}")))?;
            info!(pool_size = pool_settings.max_size, "using redis weather cache");
            Ok(Arc::new(RedisWeatherCache::new(pool)))
        }
        None => {
            let capacity = settings.memory_cache_capacity();
            warn!(capacity, "no redis url configured; using in-memory weather cache");
            Ok(Arc::new(InMemoryWeatherCache::with_capacity(clock, capacity)))
        }
    }
}

/// Build the Visual Crossing adapter.
///
/// # Errors
/// Returns [`std::io::Error`] when the base URL is malformed or the HTTP
/// client cannot be constructed.
fn build_source(settings: &GatewaySettings) -> std::io::Result<Arc<dyn WeatherSource>> {
    let base_url = settings
        .upstream_base_url()
        .map_err(|e| std::io::Error::other(format!("invalid upstream base url: {e}")))?;
    if settings.api_key().is_none() {
        warn!("no upstream api key configured; lookups will fail until one is set");
    }
    let source = VisualCrossingSource::new(VisualCrossingSettings {
        base_url,
        api_key: settings.api_key().map(str::to_owned),
        timeout: settings.upstream_timeout(),
    })
    .map_err(|e| std::io::Error::other(format!("upstream client: {e}")))?;
    Ok(Arc::new(source))
}

/// Build the lookup service from settings.
///
/// When the metrics feature is enabled and a Prometheus registry is supplied,
/// cache hit/miss and upstream failure counters are registered on it.
///
/// # Errors
/// Returns [`std::io::Error`] when an adapter cannot be constructed or metric
/// registration fails.
pub(crate) async fn build_weather_lookup(
    settings: &GatewaySettings,
    #[cfg(feature = "metrics")] registry: Option<&prometheus::Registry>,
) -> std::io::Result<Arc<dyn WeatherLookup>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let cache = build_cache(settings, clock.clone()).await?;
    let source = build_source(settings)?;
    let ports = WeatherLookupPorts::new(cache, source);

    #[cfg(feature = "metrics")]
    let ports = match registry {
        Some(registry) => {
            let metrics = PrometheusLookupMetrics::new(registry).map_err(|e| {
                std::io::Error::other(format!("lookup metrics registration failed: {e}"))
            })?;
            ports.with_metrics(Arc::new(metrics))
        }
        None => ports,
    };

    let config = settings.lookup_config();
    info!(
        cache_ttl_secs = config.cache_ttl.as_secs(),
        cache_write_policy = ?config.cache_write_policy,
        "weather lookup service configured"
    );
    Ok(Arc::new(WeatherLookupService::new(ports, clock, config)))
}
