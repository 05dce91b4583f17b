//! Driven port for fetching current weather from the upstream provider.
//!
//! Adapters classify every failure into one of the variants below so the
//! lookup service never inspects transport details.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::RawWeatherPayload;

define_port_error! {
    /// Errors surfaced while calling the weather provider.
    pub enum WeatherSourceError {
        /// Provider answered with a non-success status.
        Http { status_code: u16, message: String } =>
            "API Error: {status_code} - {message}",
        /// No response was received (DNS, refused connection, timeout).
        Unreachable { message: String } =>
            "Connection Error: {message}",
        /// The request could not be built or sent.
        Client { detail: String } =>
            "Internal error: {detail}",
        /// The response body was not a usable weather payload.
        Decode { message: String } =>
            "upstream response decode failed: {message}",
    }
}

/// Port for fetching one city's weather payload.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetch the raw payload for `city`. At most one outbound request is
    /// made per call.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use weather_gateway::domain::ports::WeatherSource;
    ///
    /// let payload = source.fetch("Paris").await?;
    /// assert_eq!(payload.resolved_address, "Paris, Île-de-France, France");
    /// # Ok::<(), weather_gateway::domain::ports::WeatherSourceError>(())
    /// ```
    async fn fetch(&self, city: &str) -> Result<RawWeatherPayload, WeatherSourceError>;
}

#[cfg(test)]
mod tests {
    use super::WeatherSourceError;

    #[test]
    fn http_errors_name_status_and_message() {
        let err = WeatherSourceError::http(401_u16, "No account found");
        assert_eq!(err.to_string(), "API Error: 401 - No account found");
    }

    #[test]
    fn unreachable_errors_read_as_connection_errors() {
        let err = WeatherSourceError::unreachable("dns lookup failed");
        assert_eq!(err.to_string(), "Connection Error: dns lookup failed");
    }
}
