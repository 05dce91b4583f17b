//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the gateway. It registers:
//!
//! - **Paths**: the weather lookup and invalidation endpoints, the welcome and
//!   status reports, and the health probes
//! - **Schemas**: the success envelope, normalised weather record, and the
//!   failure bodies returned by the HTTP adapter
//!
//! The generated specification is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::domain::{DataSource, NormalizedWeather, ResponseStatus, WeatherEnvelope};
use crate::inbound::http::error::{ErrorBody, FieldIssue, ValidationFailureBody};
use crate::inbound::http::status::{EndpointIndex, StatusBody, WelcomeBody};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather gateway API",
        description = "Read-through cached weather lookups keyed by city name."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::weather::get_weather,
        crate::inbound::http::weather::get_weather_short,
        crate::inbound::http::weather::invalidate_weather,
        crate::inbound::http::status::welcome,
        crate::inbound::http::status::status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        WeatherEnvelope,
        NormalizedWeather,
        DataSource,
        ResponseStatus,
        ErrorBody,
        FieldIssue,
        ValidationFailureBody,
        WelcomeBody,
        EndpointIndex,
        StatusBody
    )),
    tags(
        (name = "weather", description = "Cached weather lookups"),
        (name = "status", description = "Service information"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the registered paths and schema field structure.

    use super::*;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_lists_every_endpoint() {
        let doc = ApiDoc::openapi();
        for path in [
            "/weather/{city}",
            "/{city}",
            "/",
            "/status",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
        let weather = doc.paths.paths.get("/weather/{city}").expect("weather path");
        assert!(weather.get.is_some());
        assert!(weather.delete.is_some());
    }

    #[test]
    fn openapi_envelope_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let envelope = schemas.get("WeatherEnvelope").expect("envelope schema");

        for field in ["status", "source", "data", "timestamp"] {
            assert_object_schema_has_field(envelope, field);
        }
    }

    #[test]
    fn openapi_error_schema_uses_camel_case_trace_id() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error = schemas.get("ErrorBody").expect("error schema");

        assert_object_schema_has_field(error, "error");
        assert_object_schema_has_field(error, "message");
        assert_object_schema_has_field(error, "traceId");
    }
}
