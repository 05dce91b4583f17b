//! Integration tests for the Visual Crossing weather source.
//!
//! Uses wiremock for HTTP mocking. Tests cover the request shape, success
//! decoding, provider error mapping, timeouts and credential hygiene.

use std::time::Duration;

use rstest::rstest;
use url::Url;
use weather_gateway::domain::ports::{WeatherSource, WeatherSourceError};
use weather_gateway::outbound::visual_crossing::{VisualCrossingSettings, VisualCrossingSource};
use weather_gateway::test_support::weather::{sample_body, sample_payload};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key-123";

fn source_for(server: &MockServer, timeout: Duration) -> VisualCrossingSource {
    let base_url = Url::parse(&format!("{}/timeline", server.uri())).expect("valid mock url");
    VisualCrossingSource::new(VisualCrossingSettings {
        base_url,
        api_key: Some(API_KEY.to_owned()),
        timeout,
    })
    .expect("client builds")
}

#[tokio::test]
async fn fetch_returns_the_provider_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/timeline/London"))
        .and(query_param("key", API_KEY))
        .and(query_param("unitGroup", "metric"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_body("London, England")))
        .expect(1)
        .mount(&server)
        .await;

    let payload = source_for(&server, Duration::from_secs(5))
        .fetch("London")
        .await
        .expect("fetch succeeds");

    assert_eq!(payload, sample_payload("London, England"));
}

#[rstest]
#[case(
    ResponseTemplate::new(401).set_body_json(serde_json::json!({"message": "No account found with API key"})),
    401,
    "No account found with API key"
)]
#[case(
    ResponseTemplate::new(400).set_body_string("Bad API Request:Invalid location parameter value."),
    400,
    "Bad API Request:Invalid location parameter value."
)]
#[case(ResponseTemplate::new(503), 503, "Unknown error")]
#[tokio::test]
async fn provider_errors_keep_status_and_message(
    #[case] response: ResponseTemplate,
    #[case] status_code: u16,
    #[case] message: &str,
) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/timeline/Atlantis"))
        .respond_with(response)
        .mount(&server)
        .await;

    let err = source_for(&server, Duration::from_secs(5))
        .fetch("Atlantis")
        .await
        .expect_err("provider error surfaces");

    assert_eq!(err, WeatherSourceError::http(status_code, message));
    assert_eq!(
        err.to_string(),
        format!("API Error: {status_code} - {message}")
    );
}

#[tokio::test]
async fn malformed_success_bodies_are_decode_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/timeline/Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = source_for(&server, Duration::from_secs(5))
        .fetch("Paris")
        .await
        .expect_err("html is not a payload");

    assert!(matches!(err, WeatherSourceError::Decode { .. }), "{err:?}");
}

#[tokio::test]
async fn slow_providers_time_out_as_unreachable_without_leaking_the_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/timeline/Oslo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_body("Oslo, Norway"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = source_for(&server, Duration::from_millis(100))
        .fetch("Oslo")
        .await
        .expect_err("request times out");

    assert!(matches!(err, WeatherSourceError::Unreachable { .. }), "{err:?}");
    assert!(!err.to_string().contains(API_KEY));
    assert!(!format!("{err:?}").contains(API_KEY));
}

#[tokio::test]
async fn unreachable_hosts_do_not_leak_the_key() {
    let source = VisualCrossingSource::new(VisualCrossingSettings {
        base_url: Url::parse("http://127.0.0.1:9/timeline").expect("valid url"),
        api_key: Some(API_KEY.to_owned()),
        timeout: Duration::from_secs(2),
    })
    .expect("client builds");

    let err = source.fetch("Rome").await.expect_err("nothing listens there");

    assert!(matches!(err, WeatherSourceError::Unreachable { .. }), "{err:?}");
    assert!(!err.to_string().contains(API_KEY));
}
