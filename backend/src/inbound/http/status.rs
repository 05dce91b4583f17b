//! Service banner, status report and unknown-route fallback.

use actix_web::{HttpRequest, HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::iso_timestamp;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::state::HttpState;

/// Paths advertised by the welcome banner.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EndpointIndex {
    #[schema(example = "/status")]
    pub status: &'static str,
    #[schema(example = "/weather/{city}")]
    pub weather: &'static str,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WelcomeBody {
    #[schema(example = "Weather API is running")]
    pub message: &'static str,
    pub endpoints: EndpointIndex,
}

/// Body of `GET /status`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusBody {
    #[schema(example = "running")]
    pub status: &'static str,
    #[schema(example = "development")]
    pub environment: String,
    #[schema(example = "2025-08-01T10:15:30.123Z")]
    pub timestamp: String,
}

/// Service banner listing the main endpoints.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = WelcomeBody)),
    tags = ["status"],
    operation_id = "welcome"
)]
#[get("/")]
pub async fn welcome() -> web::Json<WelcomeBody> {
    web::Json(WelcomeBody {
        message: "Weather API is running",
        endpoints: EndpointIndex {
            status: "/status",
            weather: "/weather/{city}",
        },
    })
}

/// Running state, configured environment and server time.
#[utoipa::path(
    get,
    path = "/status",
    responses((status = 200, description = "Service status", body = StatusBody)),
    tags = ["status"],
    operation_id = "status"
)]
#[get("/status")]
pub async fn status(state: web::Data<HttpState>) -> web::Json<StatusBody> {
    web::Json(StatusBody {
        status: "running",
        environment: state.environment.clone(),
        timestamp: iso_timestamp(&state.clock.utc()),
    })
}

/// Default service answering every unmatched route.
pub async fn route_not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorBody::new(
        "Route not found",
        format!("The route {} does not exist on this server", req.path()),
    ))
}
