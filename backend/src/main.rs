//! Gateway entry-point: loads settings, wires adapters and serves HTTP.

mod server;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{GatewaySettings, ServerConfig, build_weather_lookup, create_server};
use weather_gateway::inbound::http::health::HealthState;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = GatewaySettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    #[cfg(feature = "metrics")]
    let prometheus = make_metrics()?;

    let weather = build_weather_lookup(
        &settings,
        #[cfg(feature = "metrics")]
        Some(&prometheus.registry),
    )
    .await?;

    let config = ServerConfig::new(
        weather,
        &settings,
        #[cfg(feature = "metrics")]
        prometheus,
    );

    info!(
        host = settings.host(),
        port = settings.port(),
        environment = settings.environment(),
        "starting weather gateway"
    );
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}

#[cfg(feature = "metrics")]
fn make_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("weather_gateway")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(format!("configure Prometheus metrics: {e}")))
}
