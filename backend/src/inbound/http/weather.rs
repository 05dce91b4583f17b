//! Weather lookup endpoints.
//!
//! ```text
//! GET /weather/{city}
//! GET /{city}
//! DELETE /weather/{city}
//! ```
//!
//! [`get_weather`] and [`invalidate_weather`] are mounted inside the
//! `/weather` scope so that scope can carry its own rate limiter;
//! [`get_weather_short`] sits at the application root and must be registered
//! after every other root-level route.

use actix_web::{HttpResponse, delete, get, web};

use crate::domain::{CityQuery, WeatherEnvelope};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::{ErrorBody, ValidationFailureBody};
use crate::inbound::http::state::HttpState;

async fn lookup(state: &HttpState, raw_city: &str) -> ApiResult<web::Json<WeatherEnvelope>> {
    let city = CityQuery::parse(raw_city)?;
    let envelope = state.weather.lookup(&city).await?;
    Ok(web::Json(envelope))
}

/// Current weather for a city, served from cache when available.
///
/// Mounted under `/weather`.
#[utoipa::path(
    get,
    path = "/weather/{city}",
    params(("city" = String, Path, description = "City name, 2-25 characters")),
    responses(
        (status = 200, description = "Weather summary", body = WeatherEnvelope),
        (status = 400, description = "Invalid city", body = ValidationFailureBody),
        (status = 429, description = "Rate limit exceeded"),
        (status = 500, description = "Lookup failed", body = ErrorBody)
    ),
    tags = ["weather"],
    operation_id = "getWeather"
)]
#[get("/{city}")]
pub async fn get_weather(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<WeatherEnvelope>> {
    lookup(&state, &path).await
}

/// Short form of [`get_weather`] mounted at the root.
#[utoipa::path(
    get,
    path = "/{city}",
    params(("city" = String, Path, description = "City name, 2-25 characters")),
    responses(
        (status = 200, description = "Weather summary", body = WeatherEnvelope),
        (status = 400, description = "Invalid city", body = ValidationFailureBody),
        (status = 500, description = "Lookup failed", body = ErrorBody)
    ),
    tags = ["weather"],
    operation_id = "getWeatherShort"
)]
#[get("/{city}")]
pub async fn get_weather_short(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<WeatherEnvelope>> {
    lookup(&state, &path).await
}

/// Drop the cached record for a city so the next lookup refetches it.
#[utoipa::path(
    delete,
    path = "/weather/{city}",
    params(("city" = String, Path, description = "City name, 2-25 characters")),
    responses(
        (status = 204, description = "Cache entry removed or already absent"),
        (status = 400, description = "Invalid city", body = ValidationFailureBody),
        (status = 500, description = "Cache unavailable", body = ErrorBody)
    ),
    tags = ["weather"],
    operation_id = "invalidateWeather"
)]
#[delete("/{city}")]
pub async fn invalidate_weather(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let city = CityQuery::parse(&path)?;
    state.weather.invalidate(&city).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "weather_tests.rs"]
mod tests;
