//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{GatewaySettings, ServerConfig};
pub(crate) use state_builders::build_weather_lookup;

use actix_web::dev::Server;
use actix_web::{HttpServer, web};
use mockable::{Clock, DefaultClock};

use weather_gateway::inbound::http::health::HealthState;
use weather_gateway::inbound::http::state::HttpState;
use weather_gateway::inbound::http::{AppDependencies, build_app};
use weather_gateway::middleware::ClientRateLimiter;

use std::sync::Arc;

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing the lookup service,
///   binding, rate limits and optional metrics settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        weather,
        bind_addr,
        environment,
        rate_limits,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    // Limiters are shared by every worker.
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state: web::Data::new(HttpState::new(weather, environment, clock)),
        general_limiter: Arc::new(ClientRateLimiter::new(
            rate_limits.max_requests,
            rate_limits.window,
        )),
        city_limiter: Arc::new(ClientRateLimiter::new(
            rate_limits.max_requests,
            rate_limits.city_window,
        )),
    };

    let server = HttpServer::new(move || {
        let app = build_app(deps.clone());

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
