//! End-to-end HTTP tests for the weather endpoints.
//!
//! The app comes from the same `build_app` the server binary uses, over the
//! real lookup service, the in-memory cache and a scripted upstream. Rate
//! limiters read a fake clock so allowances can be replenished on demand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{test, web};
use async_trait::async_trait;
use governor::clock::FakeRelativeClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use weather_gateway::domain::ports::{WeatherSource, WeatherSourceError};
use weather_gateway::domain::{
    RawWeatherPayload, WeatherLookupConfig, WeatherLookupPorts, WeatherLookupService,
};
use weather_gateway::inbound::http::health::HealthState;
use weather_gateway::inbound::http::state::HttpState;
use weather_gateway::inbound::http::{AppDependencies, build_app};
use weather_gateway::middleware::ClientRateLimiter;
use weather_gateway::outbound::cache::InMemoryWeatherCache;
use weather_gateway::test_support::MutableClock;
use weather_gateway::test_support::weather::sample_payload;

const CITY_LIMIT: u32 = 3;
const CITY_WINDOW: Duration = Duration::from_secs(600);

#[derive(Default)]
struct CountingSource {
    failures: Mutex<HashMap<String, WeatherSourceError>>,
    calls: AtomicUsize,
}

#[async_trait]
impl WeatherSource for CountingSource {
    async fn fetch(&self, city: &str) -> Result<RawWeatherPayload, WeatherSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failure = self
            .failures
            .lock()
            .expect("failures lock")
            .get(city)
            .cloned();
        match failure {
            Some(error) => Err(error),
            None => Ok(sample_payload(city)),
        }
    }
}

struct Harness {
    clock: Arc<MutableClock>,
    limiter_clock: FakeRelativeClock,
    source: Arc<CountingSource>,
    deps: AppDependencies<FakeRelativeClock>,
}

#[fixture]
fn harness() -> Harness {
    let clock = Arc::new(MutableClock::at_reference_time());
    let limiter_clock = FakeRelativeClock::default();
    let source = Arc::new(CountingSource::default());
    let cache = Arc::new(InMemoryWeatherCache::new(clock.clone()));
    let service = WeatherLookupService::new(
        WeatherLookupPorts::new(cache, source.clone()),
        clock.clone(),
        WeatherLookupConfig::default(),
    );
    let deps = AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(HttpState::new(Arc::new(service), "test", clock.clone())),
        general_limiter: Arc::new(ClientRateLimiter::with_clock(
            100,
            Duration::from_secs(900),
            limiter_clock.clone(),
        )),
        city_limiter: Arc::new(ClientRateLimiter::with_clock(
            CITY_LIMIT,
            CITY_WINDOW,
            limiter_clock.clone(),
        )),
    };
    Harness {
        clock,
        limiter_clock,
        source,
        deps,
    }
}

impl Harness {
    fn upstream_calls(&self) -> usize {
        self.source.calls.load(Ordering::SeqCst)
    }

    fn fail_upstream(&self, city: &str, error: WeatherSourceError) {
        self.source
            .failures
            .lock()
            .expect("failures lock")
            .insert(city.to_owned(), error);
    }
}

async fn body_json(res: ServiceResponse<impl MessageBody>) -> Value {
    let bytes = test::read_body(res).await;
    serde_json::from_slice(&bytes).expect("json body")
}

#[rstest]
#[actix_web::test]
async fn repeat_lookups_are_served_from_cache(harness: Harness) {
    let app = test::init_service(build_app(harness.deps.clone())).await;

    let first = test::call_service(
        &app,
        test::TestRequest::get().uri("/weather/London").to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    assert!(first.headers().contains_key("trace-id"));
    let first = body_json(first).await;
    assert_eq!(first["status"], "success");
    assert_eq!(first["source"], "api");
    assert_eq!(first["data"]["city"], "London");

    let second = test::call_service(&app, test::TestRequest::get().uri("/LONDON").to_request()).await;
    assert_eq!(second.status(), StatusCode::OK);
    let second = body_json(second).await;
    assert_eq!(second["source"], "cache");
    assert_eq!(second["data"], first["data"]);
    assert_eq!(harness.upstream_calls(), 1);
}

#[rstest]
#[actix_web::test]
async fn expired_entries_are_refetched(harness: Harness) {
    let app = test::init_service(build_app(harness.deps.clone())).await;
    let lookup = || test::TestRequest::get().uri("/weather/Paris").to_request();

    test::call_service(&app, lookup()).await;
    harness.clock.advance_seconds(43_201);
    let res = test::call_service(&app, lookup()).await;

    let body = body_json(res).await;
    assert_eq!(body["source"], "api");
    assert_eq!(body["timestamp"], "2025-08-02T00:00:01.000Z");
    assert_eq!(harness.upstream_calls(), 2);
}

#[rstest]
#[actix_web::test]
async fn delete_evicts_the_cached_record(harness: Harness) {
    let app = test::init_service(build_app(harness.deps.clone())).await;
    let lookup = || test::TestRequest::get().uri("/weather/Oslo").to_request();

    test::call_service(&app, lookup()).await;
    let res = test::call_service(
        &app,
        test::TestRequest::delete().uri("/weather/oslo").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let body = body_json(test::call_service(&app, lookup()).await).await;
    assert_eq!(body["source"], "api");
    assert_eq!(harness.upstream_calls(), 2);
}

#[rstest]
#[actix_web::test]
async fn invalid_cities_are_rejected_before_any_fetch(harness: Harness) {
    let app = test::init_service(build_app(harness.deps.clone())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/weather/R2D2").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(res).await,
        json!({
            "status": "fail",
            "error": "Invalid input",
            "details": [{
                "field": "city",
                "message": "City name contains invalid characters"
            }]
        })
    );
    assert_eq!(harness.upstream_calls(), 0);
}

#[rstest]
#[actix_web::test]
async fn upstream_failures_become_traced_internal_errors(harness: Harness) {
    harness.fail_upstream("Atlantis", WeatherSourceError::unreachable("dns error"));
    let app = test::init_service(build_app(harness.deps.clone())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/weather/Atlantis").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let trace_id = res
        .headers()
        .get("trace-id")
        .and_then(|value| value.to_str().ok())
        .expect("trace id header")
        .to_owned();
    let body = body_json(res).await;
    assert_eq!(body["error"], "Internal server error");
    assert_eq!(body["message"], "Connection Error: dns error");
    assert_eq!(body["traceId"], trace_id.as_str());
}

#[rstest]
#[actix_web::test]
async fn weather_scope_is_rate_limited(harness: Harness) {
    let app = test::init_service(build_app(harness.deps.clone())).await;
    let lookup = || test::TestRequest::get().uri("/weather/Rome").to_request();

    for _ in 0..CITY_LIMIT {
        let res = test::call_service(&app, lookup()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = test::call_service(&app, lookup()).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after = res
        .headers()
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        .expect("numeric retry-after");
    assert!((1..=CITY_WINDOW.as_secs()).contains(&retry_after));
    assert_eq!(
        res.headers()
            .get("x-content-type-options")
            .and_then(|value| value.to_str().ok()),
        Some("nosniff")
    );
    assert!(res.headers().contains_key("trace-id"));
    assert_eq!(body_json(res).await["statusCode"], 429);

    let res = test::call_service(&app, test::TestRequest::get().uri("/status").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);

    harness.limiter_clock.advance(CITY_WINDOW);
    for _ in 0..CITY_LIMIT {
        let res = test::call_service(&app, lookup()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}

#[rstest]
#[actix_web::test]
async fn root_city_route_does_not_shadow_fixed_routes(harness: Harness) {
    let app = test::init_service(build_app(harness.deps.clone())).await;

    for uri in ["/status", "/health/live"] {
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK, "{uri}");
    }
    harness.deps.health_state.mark_ready();
    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/health/ready").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(&app, test::TestRequest::get().uri("/Berlin").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["data"]["city"], "Berlin");
    assert_eq!(harness.upstream_calls(), 1);
}

#[rstest]
#[actix_web::test]
async fn root_city_route_is_outside_the_weather_limiter(harness: Harness) {
    let app = test::init_service(build_app(harness.deps.clone())).await;

    for _ in 0..CITY_LIMIT {
        test::call_service(&app, test::TestRequest::get().uri("/weather/Rome").to_request()).await;
    }
    let res = test::call_service(&app, test::TestRequest::get().uri("/Rome").to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["source"], "cache");
}

#[rstest]
#[case("/weather/London/forecast")]
#[case("/api/v1/weather")]
#[actix_web::test]
async fn unknown_routes_return_not_found(harness: Harness, #[case] uri: &str) {
    let app = test::init_service(build_app(harness.deps.clone())).await;

    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = body_json(res).await;
    assert_eq!(body["error"], "Route not found");
    assert_eq!(
        body["message"],
        format!("The route {uri} does not exist on this server")
    );
    assert_eq!(harness.upstream_calls(), 0);
}

#[rstest]
#[case("/", "message", "Weather API is running")]
#[case("/status", "environment", "test")]
#[actix_web::test]
async fn service_reports_are_served_with_security_headers(
    harness: Harness,
    #[case] uri: &str,
    #[case] field: &str,
    #[case] expected: &str,
) {
    let app = test::init_service(build_app(harness.deps.clone())).await;

    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("content-security-policy")
            .and_then(|value| value.to_str().ok()),
        Some("default-src 'self'; script-src 'self'; style-src 'self'")
    );
    assert_eq!(body_json(res).await[field], expected);
    assert_eq!(harness.upstream_calls(), 0);
}
