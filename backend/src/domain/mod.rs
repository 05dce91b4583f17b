//! Domain types, ports and services for the weather gateway.
//!
//! Purpose: keep the cache-aside lookup independent of HTTP, Redis and the
//! provider's client library. Adapters in `outbound` and `inbound` depend on
//! this module; it depends on none of them.
//!
//! Public surface:
//! - `CityQuery` and the provider/summary payload types.
//! - `WeatherTransformer` mapping provider payloads to summaries.
//! - `WeatherLookupService` implementing the `WeatherLookup` port.
//! - `WeatherLookupError` with its `LookupStage`.

pub mod error;
pub mod ports;
pub mod weather;
pub mod weather_lookup_service;
pub mod weather_transform;

pub use self::error::{LookupStage, WeatherLookupError};
pub use self::weather::{
    CityQuery, CityValidationError, DataSource, NormalizedWeather, RawForecastDay,
    RawWeatherPayload, ResponseStatus, WeatherEnvelope, iso_timestamp,
};
pub use self::weather_lookup_service::{
    CacheWritePolicy, DEFAULT_CACHE_TTL, WeatherLookupConfig, WeatherLookupPorts,
    WeatherLookupService,
};
pub use self::weather_transform::WeatherTransformer;
