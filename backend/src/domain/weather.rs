//! Weather lookup domain types.
//!
//! `RawWeatherPayload` is the provider's record as stored in the cache;
//! `NormalizedWeather` is the stable contract returned to callers. The two are
//! kept apart so the output shape can evolve without invalidating cached
//! entries.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use thiserror::Error;
use utoipa::ToSchema;

/// Minimum accepted city length, in characters, after trimming.
pub const CITY_MIN_CHARS: usize = 2;
/// Maximum accepted city length, in characters, after trimming.
pub const CITY_MAX_CHARS: usize = 25;

const CITY_PUNCTUATION: &str = "/-()`.\"'";

/// City name requested by a caller.
///
/// ## Invariants
/// - Values built with [`CityQuery::parse`] are trimmed, 2–25 characters long
///   and restricted to letters, whitespace and a small punctuation set.
/// - [`CityQuery::new`] skips validation and is meant for callers that have
///   already checked the input at their edge.
///
/// # Examples
/// ```
/// use weather_gateway::domain::CityQuery;
///
/// let query = CityQuery::parse(" Saint-Étienne ").expect("valid city");
/// assert_eq!(query.as_str(), "Saint-Étienne");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery {
    raw: String,
}

impl CityQuery {
    /// Wrap a city string that has already been validated upstream.
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Validate and trim a city string received from a caller.
    ///
    /// # Errors
    ///
    /// Returns a [`CityValidationError`] naming the first rule the input
    /// breaks.
    pub fn parse(raw: &str) -> Result<Self, CityValidationError> {
        let city = raw.trim();
        if city.is_empty() {
            return Err(CityValidationError::Missing);
        }
        let length = city.chars().count();
        if !(CITY_MIN_CHARS..=CITY_MAX_CHARS).contains(&length) {
            return Err(CityValidationError::Length);
        }
        if !city.chars().all(is_city_char) {
            return Err(CityValidationError::InvalidCharacters);
        }
        Ok(Self::new(city))
    }

    /// Borrow the city text.
    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }
}

impl std::fmt::Display for CityQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_city_char(c: char) -> bool {
    c.is_ascii_alphabetic()
        || ('\u{0080}'..='\u{024F}').contains(&c)
        || c.is_whitespace()
        || CITY_PUNCTUATION.contains(c)
}

/// Reasons a city string is rejected by [`CityQuery::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CityValidationError {
    /// No city was supplied.
    #[error("City name is required")]
    Missing,
    /// City is shorter or longer than the accepted range.
    #[error("City name must be between 2-25 characters")]
    Length,
    /// City contains characters outside the accepted set.
    #[error("City name contains invalid characters")]
    InvalidCharacters,
}

/// Provider payload for one city, stored verbatim in the cache.
///
/// Fields the gateway does not read are kept in `extra` so a cached record
/// round-trips without loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWeatherPayload {
    /// Human-readable location resolved by the provider.
    pub resolved_address: String,
    /// Latitude in decimal degrees.
    pub latitude: Number,
    /// Longitude in decimal degrees.
    pub longitude: Number,
    /// IANA timezone of the location.
    pub timezone: String,
    /// Daily forecast entries; the first entry is today.
    #[serde(default)]
    pub days: Vec<RawForecastDay>,
    /// Provider fields not interpreted by the gateway.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One daily forecast entry from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawForecastDay {
    /// Calendar date (`YYYY-MM-DD`) of the entry.
    pub datetime: String,
    /// Mean temperature in metric units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<Number>,
    /// Short textual description of the conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
    /// Relative humidity in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<Number>,
    /// Wind speed in metric units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windspeed: Option<Number>,
    /// Provider fields not interpreted by the gateway.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Weather summary returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedWeather {
    /// Resolved location name.
    #[schema(example = "Paris, France")]
    pub city: String,
    /// Latitude in decimal degrees.
    #[schema(value_type = f64, example = 48.85)]
    pub latitude: Number,
    /// Longitude in decimal degrees.
    #[schema(value_type = f64, example = 2.35)]
    pub longitude: Number,
    /// IANA timezone of the location.
    #[schema(example = "Europe/Paris")]
    pub timezone: String,
    /// Date of the forecast entry.
    #[schema(example = "2025-08-01")]
    pub date: String,
    /// Temperature in degrees Celsius.
    #[schema(value_type = Option<f64>, example = 22.5)]
    pub temperature: Option<Number>,
    /// Conditions description.
    #[schema(example = "Clear")]
    pub description: Option<String>,
    /// Relative humidity in percent.
    #[schema(value_type = Option<f64>, example = 55)]
    pub humidity: Option<Number>,
    /// Wind speed in km/h.
    #[schema(value_type = Option<f64>, example = 10)]
    pub wind_speed: Option<Number>,
}

/// Outcome marker carried by the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The lookup produced data.
    Success,
    /// The lookup was rejected.
    Fail,
}

/// Where the returned data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Served from the cache store.
    Cache,
    /// Fetched from the upstream provider.
    Api,
}

impl DataSource {
    /// Stable lowercase label used in responses and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Api => "api",
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response envelope built fresh for every successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WeatherEnvelope {
    /// Always [`ResponseStatus::Success`] for envelopes built by the lookup.
    pub status: ResponseStatus,
    /// Whether the data was served from cache or fetched upstream.
    pub source: DataSource,
    /// Normalised weather summary.
    pub data: NormalizedWeather,
    /// Moment the envelope was built.
    #[serde(serialize_with = "serialize_iso_millis")]
    #[schema(value_type = String, example = "2025-08-01T10:15:30.123Z")]
    pub timestamp: DateTime<Utc>,
}

impl WeatherEnvelope {
    /// Build a success envelope.
    pub fn success(source: DataSource, data: NormalizedWeather, timestamp: DateTime<Utc>) -> Self {
        Self {
            status: ResponseStatus::Success,
            source,
            data,
            timestamp,
        }
    }
}

/// Render a UTC instant as ISO-8601 with millisecond precision and `Z`.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use weather_gateway::domain::iso_timestamp;
///
/// let at = Utc.with_ymd_and_hms(2025, 8, 1, 9, 30, 0).single().expect("valid time");
/// assert_eq!(iso_timestamp(&at), "2025-08-01T09:30:00.000Z");
/// ```
pub fn iso_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_iso_millis<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&iso_timestamp(at))
}
