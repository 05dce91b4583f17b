//! Weather cache adapters.
//!
//! `RedisWeatherCache` is the production store. `InMemoryWeatherCache` backs
//! single-process deployments without a Redis URL and the test suites. Both
//! store the JSON encoding of the provider payload so a record written by one
//! reads back identically through the other's codec.

mod memory;
mod redis;

pub use memory::{DEFAULT_MEMORY_CACHE_CAPACITY, InMemoryWeatherCache};
pub use redis::{RedisPool, RedisPoolSettings, RedisWeatherCache, connect_redis_pool};

use crate::domain::RawWeatherPayload;
use crate::domain::ports::WeatherCacheError;

fn encode_payload(payload: &RawWeatherPayload) -> Result<Vec<u8>, WeatherCacheError> {
    serde_json::to_vec(payload).map_err(|err| WeatherCacheError::serialization(err.to_string()))
}

fn decode_payload(bytes: &[u8]) -> Result<RawWeatherPayload, WeatherCacheError> {
    serde_json::from_slice(bytes).map_err(|err| WeatherCacheError::serialization(err.to_string()))
}
