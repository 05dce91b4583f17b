//! Gateway settings loaded via OrthoConfig and the HTTP server configuration
//! built from them.

use std::sync::Arc;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use weather_gateway::domain::ports::WeatherLookup;
use weather_gateway::domain::{CacheWritePolicy, DEFAULT_CACHE_TTL, WeatherLookupConfig};
use weather_gateway::outbound::cache::DEFAULT_MEMORY_CACHE_CAPACITY;
use weather_gateway::outbound::visual_crossing::DEFAULT_VISUAL_CROSSING_BASE_URL;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REDIS_POOL_SIZE: u32 = 16;
const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 900;
const DEFAULT_CITY_RATE_LIMIT_WINDOW_SECS: u64 = 600;
const DEFAULT_ENVIRONMENT: &str = "development";

/// Process settings, read from `WEATHER_*` environment variables, the
/// configuration file and command-line flags.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WEATHER")]
pub struct GatewaySettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// Visual Crossing API key.
    pub api_key: Option<String>,
    /// Timeline endpoint override.
    pub upstream_base_url: Option<String>,
    /// Upstream request timeout in seconds.
    pub upstream_timeout_secs: Option<u64>,
    /// Lifetime of cached payloads in seconds.
    pub cache_ttl_secs: Option<u64>,
    /// Serve fetched data even when the cache write fails.
    #[ortho_config(default = false)]
    pub cache_write_best_effort: bool,
    /// Redis connection URL; the in-memory store is used when unset.
    pub redis_url: Option<String>,
    /// Maximum pooled Redis connections.
    pub redis_pool_size: Option<u32>,
    /// Entry bound of the in-memory store used without Redis.
    pub memory_cache_capacity: Option<u64>,
    /// Requests allowed per client in each window.
    pub rate_limit_max: Option<u32>,
    /// General limiter window in seconds.
    pub rate_limit_window_secs: Option<u64>,
    /// `/weather` scope limiter window in seconds.
    pub city_rate_limit_window_secs: Option<u64>,
    /// Deployment name reported by `/status`.
    pub environment: Option<String>,
}

impl std::fmt::Debug for GatewaySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewaySettings")
            .field("host", &self.host())
            .field("port", &self.port())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("upstream_base_url", &self.upstream_base_url)
            .field("cache_ttl", &self.cache_ttl())
            .field("cache_write_policy", &self.cache_write_policy())
            .field("redis", &self.redis_url.as_ref().map(|_| "<configured>"))
            .field("environment", &self.environment())
            .finish_non_exhaustive()
    }
}

impl GatewaySettings {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Upstream API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    /// Parsed timeline endpoint, falling back to the public Visual Crossing URL.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] when the configured URL is malformed.
    pub fn upstream_base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(
            self.upstream_base_url
                .as_deref()
                .unwrap_or(DEFAULT_VISUAL_CROSSING_BASE_URL),
        )
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(
            self.upstream_timeout_secs
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        )
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl_secs
            .map_or(DEFAULT_CACHE_TTL, Duration::from_secs)
    }

    pub fn cache_write_policy(&self) -> CacheWritePolicy {
        if self.cache_write_best_effort {
            CacheWritePolicy::BestEffort
        } else {
            CacheWritePolicy::Required
        }
    }

    pub fn lookup_config(&self) -> WeatherLookupConfig {
        WeatherLookupConfig {
            cache_ttl: self.cache_ttl(),
            cache_write_policy: self.cache_write_policy(),
        }
    }

    /// Redis URL, ignoring blank values.
    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    pub fn redis_pool_size(&self) -> u32 {
        self.redis_pool_size.unwrap_or(DEFAULT_REDIS_POOL_SIZE)
    }

    pub fn memory_cache_capacity(&self) -> u64 {
        self.memory_cache_capacity
            .unwrap_or(DEFAULT_MEMORY_CACHE_CAPACITY)
    }

    pub fn rate_limits(&self) -> RateLimitSettings {
        RateLimitSettings {
            max_requests: self.rate_limit_max.unwrap_or(DEFAULT_RATE_LIMIT_MAX),
            window: Duration::from_secs(
                self.rate_limit_window_secs
                    .unwrap_or(DEFAULT_RATE_LIMIT_WINDOW_SECS),
            ),
            city_window: Duration::from_secs(
                self.city_rate_limit_window_secs
                    .unwrap_or(DEFAULT_CITY_RATE_LIMIT_WINDOW_SECS),
            ),
        }
    }

    pub fn environment(&self) -> &str {
        self.environment.as_deref().unwrap_or(DEFAULT_ENVIRONMENT)
    }
}

/// Limits applied by the general and `/weather` scope limiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window: Duration,
    pub city_window: Duration,
}

/// Configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) weather: Arc<dyn WeatherLookup>,
    pub(crate) bind_addr: (String, u16),
    pub(crate) environment: String,
    pub(crate) rate_limits: RateLimitSettings,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: PrometheusMetrics,
}

impl ServerConfig {
    /// Construct a server configuration around the lookup service.
    #[must_use]
    pub fn new(
        weather: Arc<dyn WeatherLookup>,
        settings: &GatewaySettings,
        #[cfg(feature = "metrics")] prometheus: PrometheusMetrics,
    ) -> Self {
        Self {
            weather,
            bind_addr: (settings.host().to_owned(), settings.port()),
            environment: settings.environment().to_owned(),
            rate_limits: settings.rate_limits(),
            #[cfg(feature = "metrics")]
            prometheus,
        }
    }
}
