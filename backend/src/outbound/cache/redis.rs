//! Redis-backed weather cache using a `bb8` connection pool.
//!
//! Values are JSON strings written with `SET key value EX ttl`. Redis rejects
//! a zero expiry, so sub-second TTLs are rounded up to one second.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::Pool;
use bb8_redis::redis;
use tracing::debug;

use super::{decode_payload, encode_payload};
use crate::domain::RawWeatherPayload;
use crate::domain::ports::{WeatherCache, WeatherCacheError, WeatherCacheKey};

/// Shared Redis connection pool.
pub type RedisPool = Pool<RedisConnectionManager>;

/// Pool sizing and checkout limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedisPoolSettings {
    /// Maximum number of pooled connections.
    pub max_size: u32,
    /// Time to wait for a free connection before failing.
    pub connection_timeout: Duration,
}

impl Default for RedisPoolSettings {
    fn default() -> Self {
        Self {
            max_size: 16,
            connection_timeout: Duration::from_secs(5),
        }
    }
}

/// Build the process-wide Redis pool.
///
/// The pool connects lazily; an unreachable server surfaces as a
/// [`WeatherCacheError::Backend`] on the first command rather than here.
///
/// # Errors
///
/// Returns [`WeatherCacheError::Backend`] when the URL cannot be parsed or the
/// pool cannot be built.
///
/// # Example
///
/// ```ignore
/// let pool = connect_redis_pool("redis://127.0.0.1:6379", RedisPoolSettings::default()).await?;
/// let cache = RedisWeatherCache::new(pool);
/// ```
pub async fn connect_redis_pool(
    url: &str,
    settings: RedisPoolSettings,
) -> Result<RedisPool, WeatherCacheError> {
    let manager = RedisConnectionManager::new(url)
        .map_err(|err| WeatherCacheError::backend(format!("invalid redis url: {err}")))?;
    Pool::builder()
        .max_size(settings.max_size.max(1))
        .connection_timeout(settings.connection_timeout)
        .build(manager)
        .await
        .map_err(|err| WeatherCacheError::backend(format!("failed to build redis pool: {err}")))
}

/// Whole seconds passed to `EX`, never below one.
fn expiry_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs();
    if ttl.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs.max(1)
    }
}

/// Weather cache adapter backed by Redis.
#[derive(Clone)]
pub struct RedisWeatherCache {
    pool: RedisPool,
}

impl RedisWeatherCache {
    /// Wrap an existing pool.
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<bb8_redis::bb8::PooledConnection<'_, RedisConnectionManager>, WeatherCacheError>
    {
        self.pool
            .get()
            .await
            .map_err(|err| WeatherCacheError::backend(format!("redis checkout failed: {err}")))
    }
}

fn command_error(err: redis::RedisError) -> WeatherCacheError {
    WeatherCacheError::backend(err.to_string())
}

#[async_trait]
impl WeatherCache for RedisWeatherCache {
    async fn get(
        &self,
        key: &WeatherCacheKey,
    ) -> Result<Option<RawWeatherPayload>, WeatherCacheError> {
        let mut conn = self.connection().await?;
        let stored: Option<Vec<u8>> = redis::cmd("GET")
            .arg(key.as_str())
            .query_async(&mut *conn)
            .await
            .map_err(command_error)?;
        stored.as_deref().map(decode_payload).transpose()
    }

    async fn set(
        &self,
        key: &WeatherCacheKey,
        payload: &RawWeatherPayload,
        ttl: Duration,
    ) -> Result<(), WeatherCacheError> {
        let encoded = encode_payload(payload)?;
        let expiry = expiry_seconds(ttl);
        let mut conn = self.connection().await?;
        let () = redis::cmd("SET")
            .arg(key.as_str())
            .arg(encoded)
            .arg("EX")
            .arg(expiry)
            .query_async(&mut *conn)
            .await
            .map_err(command_error)?;
        debug!(key = %key, ttl_secs = expiry, "stored weather payload in redis");
        Ok(())
    }

    async fn delete(&self, key: &WeatherCacheKey) -> Result<(), WeatherCacheError> {
        let mut conn = self.connection().await?;
        let removed: i64 = redis::cmd("DEL")
            .arg(key.as_str())
            .query_async(&mut *conn)
            .await
            .map_err(command_error)?;
        debug!(key = %key, removed, "deleted weather payload from redis");
        Ok(())
    }
}
