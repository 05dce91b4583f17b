//! Application assembly shared by the server binary and the HTTP tests.
//!
//! Middleware order, outermost first: trace id, security headers, general
//! rate limit. The `/weather` scope carries its own limiter. `GET /{city}`
//! matches any single segment, so it is registered after every other route
//! and only unknown paths fall through to the JSON 404.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use governor::clock::{Clock, DefaultClock};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::status::{route_not_found, status, welcome};
use crate::inbound::http::weather::{get_weather, get_weather_short, invalidate_weather};
use crate::middleware::security_headers::security_headers;
use crate::middleware::{ClientRateLimiter, RateLimit, Trace};

/// Shared state and limiters handed to every worker's app.
pub struct AppDependencies<C: Clock = DefaultClock> {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    /// Limiter wrapping the whole app.
    pub general_limiter: Arc<ClientRateLimiter<C>>,
    /// Limiter wrapping the `/weather` scope.
    pub city_limiter: Arc<ClientRateLimiter<C>>,
}

impl<C: Clock> Clone for AppDependencies<C> {
    fn clone(&self) -> Self {
        Self {
            health_state: self.health_state.clone(),
            http_state: self.http_state.clone(),
            general_limiter: Arc::clone(&self.general_limiter),
            city_limiter: Arc::clone(&self.city_limiter),
        }
    }
}

/// Build the gateway's actix application.
pub fn build_app<C: Clock + 'static>(
    deps: AppDependencies<C>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        general_limiter,
        city_limiter,
    } = deps;

    let weather = web::scope("/weather")
        .wrap(RateLimit::new(city_limiter))
        .service(get_weather)
        .service(invalidate_weather);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(RateLimit::new(general_limiter))
        .wrap(security_headers())
        .wrap(Trace)
        .service(welcome)
        .service(status)
        .service(ready)
        .service(live)
        .service(weather);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app.service(get_weather_short)
        .default_service(web::to(route_not_found))
}
