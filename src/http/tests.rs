//! Tests for the HTTP transport module

use super::*;
use crate::connection::{ConnectionContext, ConnectionOptions};
use crate::request::{build, BuildOptions, QueryEncoding};
use crate::types::{BackoffType, Method};
use futures::StreamExt;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client() -> HttpClient {
    let config = HttpClientConfig::builder()
        .max_retries(2)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .no_rate_limit()
        .build();
    HttpClient::with_config(config).unwrap()
}

fn context(server: &MockServer) -> ConnectionContext {
    ConnectionContext::new(&ConnectionOptions::new().url(server.uri()).token("glpat-test"))
}

fn object(value: serde_json::Value) -> crate::types::JsonObject {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert!(config.rate_limit.is_some());
    assert!(config.user_agent.starts_with("pagewalk/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(60))
        .max_retries(5)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(30),
        )
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .rate_limit(RateLimiterConfig::new(5, 5))
        .build();

    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.initial_backoff, Duration::from_millis(200));
    assert_eq!(config.max_backoff, Duration::from_secs(30));
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(5, 5)));
}

#[test]
fn test_default_query_encoding_is_structured() {
    assert_eq!(test_client().query_encoding(), QueryEncoding::Structured);
}

#[tokio::test]
async fn test_execute_get_with_auth_and_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .and(header("private-token", "glpat-test"))
        .and(query_param("per_page", "2"))
        .and(query_param("order_by", "id"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Page", "1")
                .set_body_json(json!([{"id": 1}, {"id": 2}])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let descriptor = build(
        &context(&mock_server),
        Method::GET,
        "projects",
        BuildOptions::new()
            .query(object(json!({"perPage": 2, "orderBy": "id"})))
            .full_response(true),
    );

    let envelope = test_client().execute(descriptor).await.unwrap();

    assert_eq!(envelope.status, 200);
    assert_eq!(envelope.header("x-page"), Some("1"));
    assert_eq!(envelope.body, json!([{"id": 1}, {"id": 2}]));
}

#[tokio::test]
async fn test_execute_post_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v4/projects"))
        .and(body_json(json!({"name": "demo", "namespace_id": 3})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 99})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let descriptor = build(
        &context(&mock_server),
        Method::POST,
        "/projects",
        BuildOptions::new().json(json!({"name": "demo", "namespaceId": 3})),
    );

    let envelope = test_client().execute(descriptor).await.unwrap();
    assert_eq!(envelope.status, 201);
    assert_eq!(envelope.body["id"], 99);
}

#[tokio::test]
async fn test_execute_post_form_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v4/projects/1/variables"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("variable_type=file"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"key": "A"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let descriptor = build(
        &context(&mock_server),
        Method::POST,
        "projects/1/variables",
        BuildOptions::new().form(object(json!({"variableType": "file"}))),
    );

    let envelope = test_client().execute(descriptor).await.unwrap();
    assert_eq!(envelope.body["key"], "A");
}

#[tokio::test]
async fn test_execute_empty_body_is_null() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v4/projects/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let descriptor = build(
        &context(&mock_server),
        Method::DELETE,
        "projects/1",
        BuildOptions::new(),
    );

    let envelope = test_client().execute(descriptor).await.unwrap();
    assert_eq!(envelope.status, 204);
    assert!(envelope.body.is_null());
}

#[tokio::test]
async fn test_execute_invalid_json_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/version"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let descriptor = build(
        &context(&mock_server),
        Method::GET,
        "version",
        BuildOptions::new(),
    );

    let err = test_client().execute(descriptor).await.unwrap_err();
    assert!(matches!(err, crate::error::Error::Decode { .. }));
}

#[tokio::test]
async fn test_execute_404_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&mock_server)
        .await;

    let descriptor = build(
        &context(&mock_server),
        Method::GET,
        "missing",
        BuildOptions::new(),
    );

    let err = test_client().execute(descriptor).await.unwrap_err();
    assert!(matches!(
        err,
        crate::error::Error::HttpStatus { status: 404, .. }
    ));
}

#[tokio::test]
async fn test_execute_retry_on_500() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v4/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let descriptor = build(
        &context(&mock_server),
        Method::GET,
        "flaky",
        BuildOptions::new(),
    );

    let envelope = test_client().execute(descriptor).await.unwrap();
    assert_eq!(envelope.body["ok"], true);
}

#[tokio::test]
async fn test_execute_rate_limit_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/limited"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "1")
                .set_body_string("Rate limited"),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v4/limited"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let descriptor = build(
        &context(&mock_server),
        Method::GET,
        "limited",
        BuildOptions::new(),
    );

    let envelope = test_client().execute(descriptor).await.unwrap();
    assert_eq!(envelope.status, 200);
}

#[tokio::test]
async fn test_execute_retries_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/always-fail"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Unavailable"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let descriptor = build(
        &context(&mock_server),
        Method::GET,
        "always-fail",
        BuildOptions::new(),
    );

    let err = test_client().execute(descriptor).await.unwrap_err();
    assert!(matches!(
        err,
        crate::error::Error::HttpStatus { status: 503, .. }
    ));
}

#[tokio::test]
async fn test_execute_stream_collects_bytes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/projects/1/repository/archive"))
        .and(query_param("sha", "main"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"archive-bytes".to_vec()))
        .mount(&mock_server)
        .await;

    let descriptor = build(
        &context(&mock_server),
        Method::GET,
        "projects/1/repository/archive",
        BuildOptions::new()
            .query(object(json!({"sha": "main"})))
            .streaming(true),
    );

    let mut stream = test_client().execute_stream(descriptor).await.unwrap();
    let mut collected = Vec::new();
    while let Some(chunk) = stream.next().await {
        collected.extend_from_slice(&chunk.unwrap());
    }

    assert_eq!(collected, b"archive-bytes");
}

#[tokio::test]
async fn test_default_headers_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/user"))
        .and(header("x-custom", "value"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .header("x-custom", "value")
            .no_rate_limit()
            .build(),
    )
    .unwrap();

    let descriptor = build(&context(&mock_server), Method::GET, "user", BuildOptions::new());
    client.execute(descriptor).await.unwrap();
}

#[tokio::test]
async fn test_descriptor_header_replaces_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .header("Accept", "text/plain")
            .header("x-source", "default")
            .no_rate_limit()
            .build(),
    )
    .unwrap();

    let descriptor = build(
        &context(&mock_server),
        Method::GET,
        "user",
        BuildOptions::new().header("accept", "application/json"),
    );
    client.execute(descriptor).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let accept: Vec<&str> = requests[0]
        .headers
        .get_all("accept")
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(accept, vec!["application/json"]);
    assert_eq!(
        requests[0].headers.get("x-source").unwrap().to_str().unwrap(),
        "default"
    );
}

#[tokio::test]
async fn test_insecure_client_built_lazily() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "17.0"})))
        .mount(&mock_server)
        .await;

    let client = test_client();
    assert!(format!("{client:?}").contains("insecure_client_built: false"));

    let context = ConnectionContext::new(
        &ConnectionOptions::new()
            .url(mock_server.uri())
            .reject_unauthorized(false),
    );
    let descriptor = build(&context, Method::GET, "version", BuildOptions::new());
    let envelope = client.execute(descriptor).await.unwrap();

    assert_eq!(envelope.body["version"], "17.0");
    assert!(format!("{client:?}").contains("insecure_client_built: true"));
}

#[test]
fn test_calculate_backoff_constant() {
    let config = HttpClientConfig::builder()
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(100),
            Duration::from_secs(10),
        )
        .no_rate_limit()
        .build();

    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(5), Duration::from_millis(100));
}

#[test]
fn test_calculate_backoff_linear() {
    let config = HttpClientConfig::builder()
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(100),
            Duration::from_secs(10),
        )
        .no_rate_limit()
        .build();

    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(300));
}

#[test]
fn test_calculate_backoff_exponential_capped() {
    let config = HttpClientConfig::builder()
        .backoff(
            BackoffType::Exponential,
            Duration::from_millis(100),
            Duration::from_millis(500),
        )
        .no_rate_limit()
        .build();

    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
    assert_eq!(client.calculate_backoff(10), Duration::from_millis(500));
}

#[test]
fn test_http_client_debug() {
    let client = HttpClient::new().unwrap();
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("HttpClient"));
    assert!(debug_str.contains("config"));
    assert!(client.has_rate_limiter());
}
