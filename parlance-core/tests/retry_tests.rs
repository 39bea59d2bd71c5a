//! Integration tests for retry behavior against a mock server

use parlance_core::{ApiErrorKind, Client, Error, RequestOptions};
use serde_json::json;
use std::time::Duration;
use tokio_test::assert_ok;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, max_retries: u32) -> Client {
    // Honors RUST_LOG when debugging a failing retry sequence.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    Client::builder("test-key")
        .base_url(server.uri())
        .max_retries(max_retries)
        .build()
        .unwrap()
}

fn model_list() -> serde_json::Value {
    json!({"object": "list", "data": []})
}

/// A 500 response carrying a tiny retry hint so tests stay fast.
fn fast_500() -> ResponseTemplate {
    ResponseTemplate::new(500)
        .insert_header("retry-after-ms", "1")
        .set_body_json(json!({"error": {"message": "upstream broke"}}))
}

#[tokio::test]
async fn transient_500s_are_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(fast_500())
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_list()))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, 3).models.list(RequestOptions::new()).await;
    let models = assert_ok!(result);
    assert!(models.data.is_empty());
}

#[tokio::test]
async fn exhausted_budget_returns_the_final_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(fast_500())
        .expect(3)
        .mount(&server)
        .await;

    // max_retries = 2 means three attempts total.
    let err = client(&server, 2)
        .models
        .list(RequestOptions::new())
        .await
        .unwrap_err();
    let api = err.as_api_error().expect("expected API error");
    assert_eq!(api.kind, ApiErrorKind::InternalServer);
    assert_eq!(api.message.as_deref(), Some("upstream broke"));
}

#[tokio::test]
async fn x_should_retry_false_suppresses_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(
            ResponseTemplate::new(500)
                .insert_header("x-should-retry", "false")
                .set_body_json(json!({"error": {"message": "do not retry"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, 2)
        .models
        .list(RequestOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.as_api_error().unwrap().status, 500);
}

#[tokio::test]
async fn x_should_retry_true_forces_retry_of_a_400() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(
            ResponseTemplate::new(400)
                .insert_header("x-should-retry", "true")
                .insert_header("retry-after-ms", "1")
                .set_body_json(json!({"error": {"message": "flaky validation"}})),
        )
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server, 2)
        .models
        .list(RequestOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.as_api_error().unwrap().kind, ApiErrorKind::BadRequest);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": {"message": "bad"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, 2)
        .models
        .list(RequestOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.as_api_error().unwrap().kind, ApiErrorKind::BadRequest);
}

#[tokio::test]
async fn rate_limit_responses_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after-ms", "1")
                .set_body_json(json!({"error": {"message": "slow down"}})),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_list()))
        .expect(1)
        .mount(&server)
        .await;

    client(&server, 2)
        .models
        .list(RequestOptions::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn per_request_budget_overrides_client_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(fast_500())
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_list()))
        .expect(1)
        .mount(&server)
        .await;

    // Client default of zero retries would fail; the override saves it.
    let opts = RequestOptions::new().with_max_retries(1);
    client(&server, 0).models.list(opts).await.unwrap();
}

#[tokio::test]
async fn cancellation_during_backoff_aborts_the_wait() {
    let server = MockServer::start().await;
    // A long server-supplied delay keeps the call parked in backoff.
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(
            ResponseTemplate::new(500)
                .insert_header("retry-after-ms", "30000")
                .set_body_json(json!({"error": {"message": "upstream broke"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let opts = RequestOptions::new().with_cancellation(cancel.clone());
    let client = client(&server, 2);
    let call = tokio::spawn(async move { client.models.list(opts).await });

    // Let the first attempt complete and the backoff sleep begin.
    tokio::time::sleep(Duration::from_millis(200)).await;
    cancel.cancel();

    let err = call.await.unwrap().unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn pre_cancelled_token_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_list()))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let opts = RequestOptions::new().with_cancellation(cancel);

    let err = client(&server, 2)
        .models
        .list(opts)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}
