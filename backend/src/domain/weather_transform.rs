//! Conversion from the provider payload to the caller-facing summary.
//!
//! The transformer is pure: it reads only its input, never mutates it, and
//! returns the same summary for the same payload.

use serde::Deserialize as _;
use serde_json::Value;

use super::{NormalizedWeather, RawWeatherPayload, WeatherLookupError};

/// Maps raw provider payloads onto [`NormalizedWeather`].
#[derive(Debug, Default, Clone, Copy)]
pub struct WeatherTransformer;

impl WeatherTransformer {
    /// Summarise a typed payload using its first daily entry.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherLookupError::MalformedUpstreamData`] when the payload
    /// carries no daily entries.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use weather_gateway::domain::{RawWeatherPayload, WeatherTransformer};
    ///
    /// let payload: RawWeatherPayload = serde_json::from_value(json!({
    ///     "resolvedAddress": "Paris, France",
    ///     "latitude": 48.85,
    ///     "longitude": 2.35,
    ///     "timezone": "Europe/Paris",
    ///     "days": [{ "datetime": "2025-08-01", "temp": 22.5, "conditions": "Clear" }]
    /// }))
    /// .expect("payload decodes");
    ///
    /// let summary = WeatherTransformer::transform(&payload).expect("payload has a day");
    /// assert_eq!(summary.city, "Paris, France");
    /// assert_eq!(summary.humidity, None);
    /// ```
    pub fn transform(payload: &RawWeatherPayload) -> Result<NormalizedWeather, WeatherLookupError> {
        let today = payload.days.first().ok_or_else(|| {
            WeatherLookupError::malformed_upstream_data("payload contains no forecast days")
        })?;

        Ok(NormalizedWeather {
            city: payload.resolved_address.clone(),
            latitude: payload.latitude.clone(),
            longitude: payload.longitude.clone(),
            timezone: payload.timezone.clone(),
            date: today.datetime.clone(),
            temperature: today.temp.clone(),
            description: today.conditions.clone(),
            humidity: today.humidity.clone(),
            wind_speed: today.windspeed.clone(),
        })
    }

    /// Summarise an untyped payload.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherLookupError::MalformedUpstreamData`] for `null`,
    /// non-object values, objects missing required fields, and payloads
    /// without daily entries.
    pub fn transform_value(payload: &Value) -> Result<NormalizedWeather, WeatherLookupError> {
        if !payload.is_object() {
            return Err(WeatherLookupError::malformed_upstream_data(format!(
                "expected a JSON object, found {}",
                json_kind(payload)
            )));
        }
        let typed = RawWeatherPayload::deserialize(payload)
            .map_err(|err| WeatherLookupError::malformed_upstream_data(err.to_string()))?;
        Self::transform(&typed)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
