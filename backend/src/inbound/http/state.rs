//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the lookup port and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::WeatherLookup;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Read-through weather lookup.
    pub weather: Arc<dyn WeatherLookup>,
    /// Deployment environment name reported by `/status`.
    pub environment: String,
    /// Time source for status timestamps.
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Bundle the lookup port with reporting details.
    pub fn new(
        weather: Arc<dyn WeatherLookup>,
        environment: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            weather,
            environment: environment.into(),
            clock,
        }
    }
}
