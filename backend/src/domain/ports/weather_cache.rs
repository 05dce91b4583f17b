//! Port interface for storing raw weather payloads with an expiry.
use std::time::Duration;

use async_trait::async_trait;

use super::{WeatherCacheKey, define_port_error};
use crate::domain::RawWeatherPayload;

define_port_error! {
    /// Errors surfaced by the weather cache adapter.
    pub enum WeatherCacheError {
        /// Cache backend is unreachable, timing out or rejected the command.
        Backend { message: String } => "weather cache backend failure: {message}",
        /// Encoding or decoding of cached content failed.
        Serialization { message: String } => "weather cache serialisation failed: {message}",
    }
}

/// Key-value store holding raw provider payloads.
///
/// Entries expire once their time-to-live elapses; an expired entry reads
/// as absent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherCache: Send + Sync {
    /// Read the payload stored under `key`, if present and unexpired.
    async fn get(
        &self,
        key: &WeatherCacheKey,
    ) -> Result<Option<RawWeatherPayload>, WeatherCacheError>;

    /// Store `payload` under `key`, replacing any previous entry.
    async fn set(
        &self,
        key: &WeatherCacheKey,
        payload: &RawWeatherPayload,
        ttl: Duration,
    ) -> Result<(), WeatherCacheError>;

    /// Remove the entry under `key`. Removing a missing entry succeeds.
    async fn delete(&self, key: &WeatherCacheKey) -> Result<(), WeatherCacheError>;
}
