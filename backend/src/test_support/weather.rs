//! Sample provider payloads shared by unit, integration and behaviour tests.

use serde_json::{Value, json};

use crate::domain::RawWeatherPayload;

/// Provider body for `city` with one forecast day.
pub fn sample_body(resolved_address: &str) -> Value {
    json!({
        "queryCost": 1,
        "resolvedAddress": resolved_address,
        "address": resolved_address,
        "latitude": 51.5064,
        "longitude": -0.12721,
        "timezone": "Europe/London",
        "tzoffset": 1.0,
        "days": [{
            "datetime": "2025-08-01",
            "temp": 18.4,
            "conditions": "Partially cloudy",
            "humidity": 71.2,
            "windspeed": 14.8,
            "uvindex": 5
        }]
    })
}

/// Typed form of [`sample_body`].
pub fn sample_payload(resolved_address: &str) -> RawWeatherPayload {
    match serde_json::from_value(sample_body(resolved_address)) {
        Ok(payload) => payload,
        Err(error) => panic!("sample body must decode: {error}"),
    }
}
