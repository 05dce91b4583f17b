//! Reqwest-backed Visual Crossing source adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, and JSON decoding into the raw payload. The API key
//! travels in the query string, so every reqwest error is stripped of its URL
//! before it is logged or returned.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::dto::ProviderErrorDto;
use crate::domain::RawWeatherPayload;
use crate::domain::ports::{WeatherSource, WeatherSourceError};

/// Timeline endpoint of the public Visual Crossing API.
pub const DEFAULT_VISUAL_CROSSING_BASE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const UNIT_GROUP: &str = "metric";
const UNKNOWN_ERROR: &str = "Unknown error";

/// Connection settings for [`VisualCrossingSource`].
pub struct VisualCrossingSettings {
    /// Timeline endpoint; the city is appended as one path segment.
    pub base_url: Url,
    /// Provider credential. Requests fail with a client error while unset.
    pub api_key: Option<String>,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl VisualCrossingSettings {
    /// Settings for the public endpoint with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in base URL fails to parse.
    pub fn with_api_key(api_key: Option<String>) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(DEFAULT_VISUAL_CROSSING_BASE_URL)?,
            api_key,
            timeout: DEFAULT_TIMEOUT,
        })
    }
}

/// Weather source adapter performing one GET per lookup.
pub struct VisualCrossingSource {
    client: Client,
    base_url: Url,
    api_key: Option<Zeroizing<String>>,
}

impl std::fmt::Debug for VisualCrossingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisualCrossingSource")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl VisualCrossingSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let source = VisualCrossingSource::new(VisualCrossingSettings::with_api_key(key)?)?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: VisualCrossingSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            base_url: settings.base_url,
            api_key: settings
                .api_key
                .filter(|key| !key.trim().is_empty())
                .map(Zeroizing::new),
        })
    }

    fn request_url(&self, city: &str) -> Result<Url, WeatherSourceError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherSourceError::client("city must not be blank"));
        }
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| WeatherSourceError::client("weather API key is not configured"))?;

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| WeatherSourceError::client("weather base URL cannot carry a path"))?
            .pop_if_empty()
            .push(city);
        url.query_pairs_mut()
            .append_pair("key", api_key.as_str())
            .append_pair("unitGroup", UNIT_GROUP);
        Ok(url)
    }
}

#[async_trait]
impl WeatherSource for VisualCrossingSource {
    async fn fetch(&self, city: &str) -> Result<RawWeatherPayload, WeatherSourceError> {
        let url = self.request_url(city)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let error = map_status_error(status, body.as_ref());
            warn!(city, status_code = status.as_u16(), %error, "weather provider rejected request");
            return Err(error);
        }

        debug!(city, bytes = body.len(), "weather provider responded");
        parse_payload(body.as_ref())
    }
}

fn parse_payload(body: &[u8]) -> Result<RawWeatherPayload, WeatherSourceError> {
    serde_json::from_slice(body).map_err(|error| {
        WeatherSourceError::decode(format!("invalid weather JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> WeatherSourceError {
    let error = error.without_url();
    if error.is_builder() {
        WeatherSourceError::client(error.to_string())
    } else {
        WeatherSourceError::unreachable(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> WeatherSourceError {
    let message = ProviderErrorDto::message_from(body)
        .or_else(|| Some(body_preview(body)).filter(|preview| !preview.is_empty()))
        .unwrap_or_else(|| UNKNOWN_ERROR.to_owned());
    WeatherSourceError::http(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    compact.chars().take(PREVIEW_CHAR_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network mapping helpers.

    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn source() -> VisualCrossingSource {
        let settings = VisualCrossingSettings::with_api_key(Some("s3cret".to_owned()))
            .expect("default base url parses");
        VisualCrossingSource::new(settings).expect("client builds")
    }

    #[rstest]
    fn url_encodes_city_as_one_path_segment(source: VisualCrossingSource) {
        let url = source.request_url(" São Paulo/SP ").expect("url builds");
        assert_eq!(
            url.as_str(),
            "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline/\
             S%C3%A3o%20Paulo%2FSP?key=s3cret&unitGroup=metric"
        );
    }

    #[rstest]
    fn base_url_trailing_slash_is_not_doubled() {
        let settings = VisualCrossingSettings {
            base_url: Url::parse("http://127.0.0.1:9/timeline/").expect("valid url"),
            api_key: Some("k".to_owned()),
            timeout: Duration::from_secs(1),
        };
        let source = VisualCrossingSource::new(settings).expect("client builds");
        let url = source.request_url("Oslo").expect("url builds");
        assert_eq!(url.path(), "/timeline/Oslo");
    }

    #[rstest]
    #[case(None)]
    #[case(Some("   ".to_owned()))]
    fn missing_api_key_is_a_client_error(#[case] api_key: Option<String>) {
        let settings =
            VisualCrossingSettings::with_api_key(api_key).expect("default base url parses");
        let source = VisualCrossingSource::new(settings).expect("client builds");
        let error = source.request_url("Oslo").expect_err("no key");
        assert!(matches!(error, WeatherSourceError::Client { .. }));
    }

    #[rstest]
    fn debug_output_redacts_the_key(source: VisualCrossingSource) {
        let rendered = format!("{source:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[rstest]
    #[case::json_message(
        StatusCode::UNAUTHORIZED,
        br#"{"message":"No account found"}"#.as_slice(),
        "No account found"
    )]
    #[case::plain_text(
        StatusCode::BAD_REQUEST,
        b"Bad API Request:Invalid location\n  parameter value.".as_slice(),
        "Bad API Request:Invalid location parameter value."
    )]
    #[case::empty_body(StatusCode::BAD_GATEWAY, b"".as_slice(), "Unknown error")]
    fn maps_http_statuses_with_provider_message(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] expected: &str,
    ) {
        let error = map_status_error(status, body);
        assert_eq!(error, WeatherSourceError::http(status.as_u16(), expected));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        assert_eq!(body_preview(body.as_bytes()).chars().count(), 160);
    }

    #[rstest]
    #[case(b"null".as_slice())]
    #[case(b"<html>maintenance</html>".as_slice())]
    #[case(br#"{"days":[]}"#.as_slice())]
    fn undecodable_bodies_are_decode_errors(#[case] body: &[u8]) {
        let error = parse_payload(body).expect_err("not a payload");
        assert!(matches!(error, WeatherSourceError::Decode { .. }));
    }
}
