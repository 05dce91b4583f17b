//! Driving port for the read-through weather lookup.
//!
//! Inbound adapters depend on this trait rather than on the service type so
//! handlers can be exercised against a mock.

use async_trait::async_trait;

use crate::domain::{CityQuery, WeatherEnvelope, WeatherLookupError};

/// Use-case port for resolving and invalidating a city's weather.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    /// Return weather for `city`, from cache when available.
    async fn lookup(&self, city: &CityQuery) -> Result<WeatherEnvelope, WeatherLookupError>;

    /// Drop any cached entry for `city`.
    async fn invalidate(&self, city: &CityQuery) -> Result<(), WeatherLookupError>;
}
