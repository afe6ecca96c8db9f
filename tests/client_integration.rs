//! Client Integration Tests
//!
//! Exercises the outbound HTTP clients against in-process Axum mock servers
//! bound to ephemeral localhost ports. Each test verifies the wire contract:
//! URL shape, request body, and how responses map into the error taxonomy.

use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

use irrigos::clients::{GeoLocator, InferenceClient, TelemetrySink, WeatherClient};
use irrigos::recommend::RecommendationOrchestrator;
use irrigos::types::{CropType, Location, SoilType, TelemetryEvent, UserQuery};
use irrigos::{Error, RetryPolicy};

/// Serve a router on an ephemeral port and return its base URL.
async fn spawn_mock(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        timeout: std::time::Duration::from_secs(2),
        max_retries: 0,
        backoff: std::time::Duration::from_millis(10),
    }
}

// ============================================================================
// WeatherClient
// ============================================================================

#[tokio::test]
async fn test_weather_returns_first_hourly_sample() {
    let router = Router::new().route(
        "/v1/forecast",
        get(|| async {
            Json(serde_json::json!({"hourly":{"temperature_2m":[21.5, 22.0]}}))
        }),
    );
    let base = spawn_mock(router).await;

    let client = WeatherClient::new(&base, fast_policy());
    let reading = client
        .current_temperature(11.0, 76.9, &CancellationToken::new())
        .await
        .unwrap();
    assert!((reading.temperature_celsius - 21.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_weather_non_success_maps_to_fetch_failed() {
    let router = Router::new().route(
        "/v1/forecast",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = spawn_mock(router).await;

    let client = WeatherClient::new(&base, fast_policy());
    let err = client
        .current_temperature(11.0, 76.9, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::FetchFailed(_)));
}

#[tokio::test]
async fn test_weather_empty_series_maps_to_fetch_failed() {
    let router = Router::new().route(
        "/v1/forecast",
        get(|| async { Json(serde_json::json!({"hourly":{"temperature_2m":[]}})) }),
    );
    let base = spawn_mock(router).await;

    let client = WeatherClient::new(&base, fast_policy());
    let err = client
        .current_temperature(11.0, 76.9, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::FetchFailed(_)));
}

#[tokio::test]
async fn test_weather_unreachable_host_maps_to_fetch_failed() {
    // Closed port: connection refused, retried then surfaced as FetchFailed.
    let client = WeatherClient::new("http://127.0.0.1:9", fast_policy());
    let err = client
        .current_temperature(11.0, 76.9, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::FetchFailed(_)));
}

// ============================================================================
// TelemetrySink
// ============================================================================

#[tokio::test]
async fn test_telemetry_push_sends_field2_exactly_once() {
    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route(
            "/update",
            get(
                |State(seen): State<Arc<Mutex<Vec<String>>>>, RawQuery(q): RawQuery| async move {
                    seen.lock().unwrap().push(q.unwrap_or_default());
                    "1"
                },
            ),
        )
        .with_state(Arc::clone(&seen));
    let base = spawn_mock(router).await;

    let sink = TelemetrySink::new(&base, "WRITEKEY", fast_policy());
    sink.push_status(TelemetryEvent { status_value: 50 }, &CancellationToken::new())
        .await
        .unwrap();

    let queries = seen.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].matches("field2=50").count(), 1);
    assert!(queries[0].contains("api_key=WRITEKEY"));
}

#[tokio::test]
async fn test_telemetry_non_success_maps_to_fetch_failed() {
    let router = Router::new().route("/update", get(|| async { StatusCode::BAD_REQUEST }));
    let base = spawn_mock(router).await;

    let sink = TelemetrySink::new(&base, "WRITEKEY", fast_policy());
    let err = sink
        .push_status(TelemetryEvent { status_value: 50 }, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::FetchFailed(_)));
}

// ============================================================================
// InferenceClient / RecommendationOrchestrator
// ============================================================================

#[derive(Clone)]
struct InferenceMockState {
    calls: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<serde_json::Value>>>,
}

fn inference_mock(reply: &'static str) -> (Router, InferenceMockState) {
    let state = InferenceMockState {
        calls: Arc::new(AtomicUsize::new(0)),
        bodies: Arc::new(Mutex::new(Vec::new())),
    };
    let router = Router::new()
        .route(
            "/chat/completions",
            post(
                move |State(state): State<InferenceMockState>, Json(body): Json<serde_json::Value>| async move {
                    state.calls.fetch_add(1, Ordering::SeqCst);
                    state.bodies.lock().unwrap().push(body);
                    Json(serde_json::json!({
                        "choices": [{"message": {"role": "assistant", "content": reply}}]
                    }))
                    .into_response()
                },
            ),
        )
        .with_state(state.clone());
    (router, state)
}

#[tokio::test]
async fn test_inference_returns_first_message_content_verbatim() {
    let (router, _state) = inference_mock("  Use drip irrigation.\nTwice daily.  ");
    let base = spawn_mock(router).await;

    let client = InferenceClient::new(&base, "test-key", "mixtral-8x7b-32768", fast_policy());
    let text = client
        .get_completion("persona", "question", &CancellationToken::new())
        .await
        .unwrap();
    // Pass-through: no trimming, no rewriting.
    assert_eq!(text, "  Use drip irrigation.\nTwice daily.  ");
}

#[tokio::test]
async fn test_inference_non_success_maps_to_service_unavailable() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { StatusCode::TOO_MANY_REQUESTS }),
    );
    let base = spawn_mock(router).await;

    let client = InferenceClient::new(&base, "test-key", "mixtral-8x7b-32768", fast_policy());
    let err = client
        .get_completion("persona", "question", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ServiceUnavailable(_)));
}

#[tokio::test]
async fn test_recommend_embeds_query_fields_and_persona() {
    let (router, state) = inference_mock("advice");
    let base = spawn_mock(router).await;

    let client = InferenceClient::new(&base, "test-key", "mixtral-8x7b-32768", fast_policy());
    let orchestrator = RecommendationOrchestrator::new(client);

    let query = UserQuery {
        location: Location::RegionB,
        soil_type: SoilType::Sandy,
        crop_type: CropType::Rice,
    };
    let recommendation = orchestrator
        .recommend(&query, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(recommendation.text, "advice");

    let bodies = state.bodies.lock().unwrap();
    let messages = bodies[0]["messages"].as_array().unwrap();
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(
        messages[0]["content"],
        "You are an expert in precision agriculture."
    );
    let prompt = messages[1]["content"].as_str().unwrap();
    assert!(prompt.contains("Region B"));
    assert!(prompt.contains("Sandy"));
    assert!(prompt.contains("Rice"));
    assert_eq!(bodies[0]["model"], "mixtral-8x7b-32768");
}

/// No caching: two identical queries each invoke the remote service.
#[tokio::test]
async fn test_recommend_is_not_deduplicated() {
    let (router, state) = inference_mock("advice");
    let base = spawn_mock(router).await;

    let client = InferenceClient::new(&base, "test-key", "mixtral-8x7b-32768", fast_policy());
    let orchestrator = RecommendationOrchestrator::new(client);

    let query = UserQuery {
        location: Location::RegionA,
        soil_type: SoilType::Clay,
        crop_type: CropType::Wheat,
    };
    let cancel = CancellationToken::new();
    orchestrator.recommend(&query, &cancel).await.unwrap();
    orchestrator.recommend(&query, &cancel).await.unwrap();

    assert_eq!(state.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_cancelled_token_aborts_inference_call() {
    let (router, _state) = inference_mock("advice");
    let base = spawn_mock(router).await;

    let client = InferenceClient::new(&base, "test-key", "mixtral-8x7b-32768", fast_policy());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client
        .get_completion("persona", "question", &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled | Error::ServiceUnavailable(_)));
}

// ============================================================================
// GeoLocator
// ============================================================================

#[tokio::test]
async fn test_geolocate_success() {
    let router = Router::new().route(
        "/json",
        get(|| async {
            Json(serde_json::json!({"status":"success","lat":11.0168,"lon":76.9558}))
        }),
    );
    let base = spawn_mock(router).await;

    let geo = GeoLocator::new(&base, fast_policy());
    let coords = geo.locate(&CancellationToken::new()).await.unwrap();
    assert!((coords.latitude - 11.0168).abs() < f64::EPSILON);
    assert!((coords.longitude - 76.9558).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_geolocate_fail_status_maps_to_fetch_failed() {
    let router = Router::new().route(
        "/json",
        get(|| async { Json(serde_json::json!({"status":"fail","message":"reserved range"})) }),
    );
    let base = spawn_mock(router).await;

    let geo = GeoLocator::new(&base, fast_policy());
    let err = geo.locate(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, Error::FetchFailed(_)));
}
