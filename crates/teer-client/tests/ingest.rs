//! Ingest resource integration tests.

mod common;

use std::time::Duration;

use common::{client_for, options_for, RecordingDiagnostics, RecordingTransport, API_KEY};
use reqwest::header::{HeaderName, HeaderValue};
use serde_json::json;
use teer_client::{
    AnthropicCache, Cache, ClientError, IngestPayload, Metadata, Provider, RequestOptions,
    Resource, TeerClient, Usage, ValidationError,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn haiku_payload() -> IngestPayload {
    IngestPayload::new(
        Provider::Anthropic,
        "claude-3-haiku-20240307",
        Usage::new(1000, 2000),
    )
    .with_function_id("f")
}

// ============================================================================
// Successful sends
// ============================================================================

#[tokio::test]
async fn send_posts_exact_body_with_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/ingest"))
        .and(header("authorization", "Bearer k"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "provider": "anthropic",
            "model": "claude-3-haiku-20240307",
            "function_id": "f",
            "usage": {"input": 1000, "output": 2000}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.ingest().send(&haiku_payload()).await.unwrap();

    assert_eq!(response, json!({"status": "ok"}));
}

#[tokio::test]
async fn send_with_cache_trace_and_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/ingest"))
        .and(body_json(json!({
            "provider": "anthropic",
            "model": "claude-3-haiku-20240307",
            "function_id": "legal-document-analysis",
            "usage": {
                "input": 2000,
                "output": 3000,
                "cache": {
                    "anthropic": {
                        "cache_creation_input_tokens": 1500,
                        "cache_read_input_tokens": 500
                    }
                }
            },
            "trace_id": "trace-abcdef",
            "span_id": "span-123456",
            "batch": true,
            "metadata": {"user_id": "user_123", "session_id": "session_456"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let payload = IngestPayload::new(
        Provider::Anthropic,
        "claude-3-haiku-20240307",
        Usage::new(2000, 3000).with_cache(Cache::anthropic(AnthropicCache {
            cache_creation_input_tokens: Some(1500),
            cache_read_input_tokens: Some(500),
        })),
    )
    .with_function_id("legal-document-analysis")
    .with_trace("trace-abcdef", "span-123456")
    .with_batch(true)
    .with_metadata(
        Metadata::new()
            .with_user_id("user_123")
            .with_session_id("session_456"),
    );

    client_for(&server).ingest().send(&payload).await.unwrap();
}

#[tokio::test]
async fn send_json_forwards_body_unchanged() {
    let server = MockServer::start().await;

    let body = json!({
        "provider": "openai",
        "model": "gpt-4o",
        "usage": {"input": 800, "output": 2500, "cache": {"openai": {"input_cached_tokens": 300}}},
        "metadata": {"project_id": "p1", "custom_key": 7},
        "experimental_flag": true
    });

    Mock::given(method("POST"))
        .and(path("/v1/ingest"))
        .and(body_json(body.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).ingest().send_json(&body).await.unwrap();
}

#[tokio::test]
async fn plain_text_response_is_wrapped() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/ingest"))
        .respond_with(ResponseTemplate::new(200).set_body_string("accepted"))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .ingest()
        .send(&haiku_payload())
        .await
        .unwrap();

    assert_eq!(response, json!({"text": "accepted"}));
}

#[tokio::test]
async fn extra_headers_are_merged() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/ingest"))
        .and(header("authorization", "Bearer k"))
        .and(header("x-request-id", "req_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let options = RequestOptions::new().with_header(
        HeaderName::from_static("x-request-id"),
        HeaderValue::from_static("req_1"),
    );
    client_for(&server)
        .ingest()
        .send_with_options(&haiku_payload(), &options)
        .await
        .unwrap();
}

#[tokio::test]
async fn ingest_base_url_override() {
    let api = MockServer::start().await;
    let track = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/ingest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"via": "track"})))
        .expect(1)
        .mount(&track)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&api)
        .await;

    let client = TeerClient::with_options(
        options_for(&api).with_resource_base_url(Resource::Ingest, track.uri()),
    )
    .unwrap();

    let response = client.ingest().send(&haiku_payload()).await.unwrap();
    assert_eq!(response, json!({"via": "track"}));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn server_error_surfaces_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/ingest"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "x"})))
        .expect(1)
        .mount(&server)
        .await;

    let payload = haiku_payload();
    let before = payload.clone();

    let err = client_for(&server)
        .ingest()
        .send(&payload)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.body_json(), Some(json!({"error": "x"})));
    assert_eq!(payload, before);
}

#[tokio::test]
async fn timeout_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/ingest"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let options = RequestOptions::new().with_timeout(Duration::from_millis(50));
    let err = client_for(&server)
        .ingest()
        .send_with_options(&haiku_payload(), &options)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn invalid_payloads_never_reach_the_transport() {
    let transport = RecordingTransport::responding(200, "{}");
    let client = transport.client();

    let missing_usage = json!({"provider": "anthropic", "model": "claude-3-haiku-20240307"});
    let err = client.ingest().send_json(&missing_usage).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Validation(ValidationError::MissingField(ref f)) if f == "usage"
    ));

    let missing_input = json!({
        "provider": "anthropic",
        "model": "claude-3-haiku-20240307",
        "usage": {"output": 10}
    });
    let err = client.ingest().send_json(&missing_input).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Validation(ValidationError::MissingField(ref f)) if f == "usage.input"
    ));

    let conflicting_meters = json!({
        "provider": "openai",
        "model": "gpt-4o",
        "usage": {"input": 1, "output": 1},
        "billing": {
            "provider": "stripe",
            "fields": {"customer": "cus_1", "meter": "m", "meters": {"input": "m1"}}
        }
    });
    let err = client.ingest().send_json(&conflicting_meters).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Validation(ValidationError::ConflictingMeters)
    ));

    let empty_model = IngestPayload::new(Provider::Google, "", Usage::new(1, 1));
    let err = client.ingest().send(&empty_model).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn stub_transport_sees_one_request() {
    let transport = RecordingTransport::responding(200, r#"{"ok":true}"#);
    let client = transport.client();

    client.ingest().send(&haiku_payload()).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, reqwest::Method::POST);
    assert_eq!(request.url, "https://h/v1/ingest");
    assert_eq!(request.headers["authorization"], format!("Bearer {API_KEY}").as_str());
    assert_eq!(request.timeout, Duration::from_secs(10));
    assert_eq!(
        request.body,
        Some(serde_json::to_value(haiku_payload()).unwrap())
    );
}

#[tokio::test]
async fn diagnostics_observe_failures() {
    let transport = RecordingTransport::responding(503, "unavailable");
    let diagnostics = RecordingDiagnostics::default();
    let client = TeerClient::with_options(
        teer_client::ClientOptions::default()
            .with_api_key(API_KEY)
            .with_base_url("https://h")
            .with_transport(transport.clone())
            .with_diagnostics(diagnostics.clone()),
    )
    .unwrap();

    let err = client.ingest().send(&haiku_payload()).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 503, ref body } if body == "unavailable"));

    assert_eq!(
        diagnostics.events(),
        vec![
            "request POST https://h/v1/ingest".to_string(),
            "response 503".to_string(),
            "failure 503".to_string(),
        ]
    );
}
