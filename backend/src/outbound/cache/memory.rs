//! Process-local weather cache backed by `moka`.
//!
//! Entries carry their own TTL through a [`moka::Expiry`] policy, so moka
//! evicts them in the background once they lapse and the store never holds
//! more than its capacity. Reads also check the expiry derived from the
//! injected clock, which lets tests move time forward without sleeping.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use moka::Expiry;
use moka::future::Cache;

use super::{decode_payload, encode_payload};
use crate::domain::RawWeatherPayload;
use crate::domain::ports::{WeatherCache, WeatherCacheError, WeatherCacheKey};

/// Entry bound used by [`InMemoryWeatherCache::new`].
pub const DEFAULT_MEMORY_CACHE_CAPACITY: u64 = 10_000;

#[derive(Clone)]
struct Entry {
    bytes: Arc<[u8]>,
    ttl: Duration,
    expires_at: DateTime<Utc>,
}

/// Expires each entry after the TTL it was written with.
struct EntryTtl;

impl Expiry<String, Entry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Bounded TTL store holding JSON-encoded payloads, so records take the same
/// codec path as in Redis.
pub struct InMemoryWeatherCache {
    entries: Cache<String, Entry>,
    clock: Arc<dyn Clock>,
}

impl InMemoryWeatherCache {
    /// Create an empty store with [`DEFAULT_MEMORY_CACHE_CAPACITY`].
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_capacity(clock, DEFAULT_MEMORY_CACHE_CAPACITY)
    }

    /// Create an empty store holding at most `max_entries` records.
    pub fn with_capacity(clock: Arc<dyn Clock>, max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(EntryTtl)
            .build();
        Self { entries, clock }
    }

    /// Number of live entries once pending evictions have run.
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

#[async_trait]
impl WeatherCache for InMemoryWeatherCache {
    async fn get(
        &self,
        key: &WeatherCacheKey,
    ) -> Result<Option<RawWeatherPayload>, WeatherCacheError> {
        let Some(entry) = self.entries.get(key.as_str()).await else {
            return Ok(None);
        };
        if entry.expires_at <= self.clock.utc() {
            self.entries.invalidate(key.as_str()).await;
            return Ok(None);
        }
        decode_payload(&entry.bytes).map(Some)
    }

    async fn set(
        &self,
        key: &WeatherCacheKey,
        payload: &RawWeatherPayload,
        ttl: Duration,
    ) -> Result<(), WeatherCacheError> {
        let bytes = encode_payload(payload)?;
        let lifetime = TimeDelta::from_std(ttl)
            .map_err(|err| WeatherCacheError::backend(format!("ttl out of range: {err}")))?;
        let entry = Entry {
            bytes: bytes.into(),
            ttl,
            expires_at: self.clock.utc() + lifetime,
        };
        self.entries.insert(key.as_str().to_owned(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &WeatherCacheKey) -> Result<(), WeatherCacheError> {
        self.entries.invalidate(key.as_str()).await;
        Ok(())
    }
}
