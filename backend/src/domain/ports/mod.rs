//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`WeatherCache`, `WeatherSource`, `LookupMetrics`) describe
//! what the lookup needs from adapters; the driving port `WeatherLookup` is
//! what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod cache_key;
mod lookup_metrics;
mod weather_cache;
mod weather_lookup;
mod weather_source;

pub use cache_key::{WEATHER_CACHE_KEY_PREFIX, WeatherCacheKey, WeatherCacheKeyError};
#[cfg(test)]
pub use lookup_metrics::MockLookupMetrics;
pub use lookup_metrics::{LookupMetrics, LookupMetricsError, NoOpLookupMetrics};
#[cfg(test)]
pub use weather_cache::MockWeatherCache;
pub use weather_cache::{WeatherCache, WeatherCacheError};
#[cfg(test)]
pub use weather_lookup::MockWeatherLookup;
pub use weather_lookup::WeatherLookup;
#[cfg(test)]
pub use weather_source::MockWeatherSource;
pub use weather_source::{WeatherSource, WeatherSourceError};
