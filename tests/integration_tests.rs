//! Integration tests for the client core, using wiremock to play the service.

use http::Method;
use schematics::auth::NoAuthAuthenticator;
use schematics::request::{FilePart, Request};
use schematics::transport::{RateLimitConfig, RetryOnStatus, DEFAULT_USER_AGENT};
use schematics::{Client, Error, RetryStrategy};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Location {
    region: String,
    geography: String,
}

fn location() -> Location {
    Location {
        region: "us-south".to_string(),
        geography: "North America".to_string(),
    }
}

fn client_for(mock_server: &MockServer) -> Client {
    Client::builder()
        .service_url(mock_server.uri())
        .unwrap()
        .authenticator(Arc::new(NoAuthAuthenticator))
        .build()
        .unwrap()
}

fn get(path: &'static str) -> Request {
    Request::new("test_operation", Method::GET, path)
}

#[tokio::test]
async fn test_successful_call_carries_metadata() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/locations"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(location())
                .insert_header("x-request-id", "req-1"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.call::<Location>(get("/v1/locations")).await.unwrap();

    assert_eq!(response.data, location());
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.attempts, 1);
    assert!(!response.was_retried());
    assert_eq!(response.header("x-request-id"), Some("req-1"));
    assert!(response.raw_body.contains("North America"));
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/version"))
        .and(header("accept", "application/json"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .and(header("x-correlation-id", "corr-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(location()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .service_url(mock_server.uri())
        .unwrap()
        .authenticator(Arc::new(NoAuthAuthenticator))
        .default_header("X-Correlation-Id", "corr-7")
        .unwrap()
        .build()
        .unwrap();

    client.call::<Location>(get("/v1/version")).await.unwrap();
}

#[tokio::test]
async fn test_path_params_query_and_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/workspaces/ws%2F1/template_data/t-1/values"))
        .and(query_param("destroy_resources", "true"))
        .and(header("refresh_token", "rt"))
        .and(body_json(serde_json::json!({ "region": "us-south", "geography": "North America" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(location()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = Request::new(
        "test_operation",
        Method::PUT,
        "/v1/workspaces/{w_id}/template_data/{t_id}/values",
    )
    .path_param("w_id", "ws/1")
    .path_param("t_id", "t-1")
    .header("refresh_token", "rt")
    .unwrap()
    .query("destroy_resources", true)
    .json(&location())
    .unwrap();

    client.call::<Location>(request).await.unwrap();
}

#[tokio::test]
async fn test_service_url_path_is_kept_as_prefix() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/schematics/v2/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(location()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .service_url(format!("{}/schematics/", mock_server.uri()))
        .unwrap()
        .authenticator(Arc::new(NoAuthAuthenticator))
        .build()
        .unwrap();

    client.call::<Location>(get("/v2/jobs")).await.unwrap();
}

#[tokio::test]
async fn test_unbound_path_param_fails_before_sending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.call::<Location>(get("/v2/jobs/{job_id}")).await;

    match result {
        Err(Error::Configuration(ref message)) => assert!(message.contains("job_id")),
        _ => panic!("Expected Configuration error, got {:?}", result),
    }
}

#[tokio::test]
async fn test_api_error_with_service_error_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/workspaces/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({
                    "errors": [{ "code": "not_found", "message": "Workspace not found" }],
                    "trace": "trace-123",
                    "status_code": 404
                }))
                .insert_header("x-request-id", "req-404"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.call::<Location>(get("/v1/workspaces/missing")).await;

    let error = result.unwrap_err();
    assert_eq!(error.status().map(|s| s.as_u16()), Some(404));
    assert!(!error.is_retryable());
    assert!(error.to_string().contains("Workspace not found"));

    match error {
        Error::Api { headers, body, .. } => {
            assert_eq!(headers.get("x-request-id").unwrap(), "req-404");
            let body = body.unwrap();
            assert_eq!(body.trace.as_deref(), Some("trace-123"));
            assert_eq!(body.message(), Some("Workspace not found"));
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_api_error_with_flat_error_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/actions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "requestid": "r-1",
            "messageid": "M1037",
            "message": "Action name is invalid"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .call::<Location>(Request::new("create_action", Method::POST, "/v2/actions"))
        .await;

    let body = result.as_ref().unwrap_err().api_error_body().unwrap();
    assert_eq!(body.messageid.as_deref(), Some("M1037"));
    assert_eq!(body.message(), Some("Action name is invalid"));
}

#[tokio::test]
async fn test_api_error_with_plain_text_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/version"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let error = client.call::<Location>(get("/v1/version")).await.unwrap_err();

    assert_eq!(error.status().map(|s| s.as_u16()), Some(502));
    assert_eq!(error.raw_response(), Some("Bad gateway"));
    assert!(error.api_error_body().is_none());
    assert!(error.is_retryable());
}

#[tokio::test]
async fn test_deserialization_failure_keeps_raw_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"region": 42}"#))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.call::<Location>(get("/v1/locations")).await;

    match result {
        Err(Error::DeserializationFailed {
            ref raw_response,
            status,
            ..
        }) => {
            assert_eq!(raw_response, r#"{"region": 42}"#);
            assert_eq!(status.as_u16(), 200);
        }
        _ => panic!("Expected DeserializationFailed, got {:?}", result),
    }
}

#[tokio::test]
async fn test_call_text_unquotes_json_strings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/workspaces/ws-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#""Workspace deleted""#))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("line one\nline two"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let deleted = client
        .call_text(Request::new("delete", Method::DELETE, "/v1/workspaces/ws-1"))
        .await
        .unwrap();
    assert_eq!(deleted.data, "Workspace deleted");

    let logs = client.call_text(get("/v1/logs")).await.unwrap();
    assert_eq!(logs.data, "line one\nline two");
}

#[tokio::test]
async fn test_call_empty_accepts_no_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v2/jobs/job-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .call_empty(Request::new("delete_job", Method::DELETE, "/v2/jobs/job-1"))
        .await
        .unwrap();

    assert_eq!(response.status_code(), 204);
    assert!(response.raw_body.is_empty());
}

#[tokio::test]
async fn test_multipart_upload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v2/actions/a-1/template_repo_upload"))
        .and(header_exists("content-type"))
        .respond_with(move |req: &wiremock::Request| {
            let content_type = req
                .headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            let body = String::from_utf8_lossy(&req.body);
            if content_type.starts_with("multipart/form-data")
                && body.contains(r#"name="file"; filename="playbook.tar""#)
                && body.contains("tar-bytes")
            {
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "has_received_file": true }))
            } else {
                ResponseTemplate::new(400)
            }
        })
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = Request::new(
        "upload_template_tar_action",
        Method::PUT,
        "/v2/actions/{action_id}/template_repo_upload",
    )
    .path_param("action_id", "a-1")
    .file(FilePart::tar("playbook.tar", b"tar-bytes".to_vec()));

    let response = client.call::<serde_json::Value>(request).await.unwrap();
    assert_eq!(response.data["has_received_file"], true);
}

#[tokio::test]
async fn test_no_retry_by_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/jobs"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.call::<Location>(get("/v2/jobs")).await;

    match result {
        Err(Error::Api { status, .. }) => assert_eq!(status.as_u16(), 503),
        _ => panic!("Expected Api error without retries, got {:?}", result),
    }
}

#[tokio::test]
async fn test_retry_on_server_error() {
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();

    // Two failures, then success.
    Mock::given(method("GET"))
        .and(path("/v1/locations"))
        .respond_with(move |_req: &wiremock::Request| {
            let count = attempt_count_clone.fetch_add(1, Ordering::SeqCst);
            if count < 2 {
                ResponseTemplate::new(500).set_body_string("Server error")
            } else {
                ResponseTemplate::new(200).set_body_json(location())
            }
        })
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .service_url(mock_server.uri())
        .unwrap()
        .authenticator(Arc::new(NoAuthAuthenticator))
        .retry_strategy(RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
            max_retries: 3,
            jitter: false,
        })
        .build()
        .unwrap();

    let response = client.call::<Location>(get("/v1/locations")).await.unwrap();

    assert_eq!(response.data, location());
    assert_eq!(response.attempts, 3);
    assert!(response.was_retried());
    assert_eq!(attempt_count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_max_retries_exceeded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/locations"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server error"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .service_url(mock_server.uri())
        .unwrap()
        .authenticator(Arc::new(NoAuthAuthenticator))
        .retry_strategy(RetryStrategy::Linear {
            delay: Duration::from_millis(10),
            max_retries: 2,
        })
        .build()
        .unwrap();

    let result = client.call::<Location>(get("/v1/locations")).await;

    match result {
        Err(Error::MaxRetriesExceeded {
            attempts,
            ref last_error,
        }) => {
            assert_eq!(attempts, 3);
            assert_eq!(last_error.status().map(|s| s.as_u16()), Some(500));
        }
        _ => panic!("Expected MaxRetriesExceeded, got {:?}", result),
    }
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/workspaces/ws-1"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .service_url(mock_server.uri())
        .unwrap()
        .authenticator(Arc::new(NoAuthAuthenticator))
        .retry_strategy(RetryStrategy::Linear {
            delay: Duration::from_millis(10),
            max_retries: 3,
        })
        .build()
        .unwrap();

    let result = client.call::<Location>(get("/v1/workspaces/ws-1")).await;

    match result {
        Err(Error::Api { status, .. }) => assert_eq!(status.as_u16(), 403),
        _ => panic!("Expected Api error, got {:?}", result),
    }
}

#[tokio::test]
async fn test_custom_retry_predicate() {
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();

    Mock::given(method("GET"))
        .and(path("/v2/agents/a-1/health"))
        .respond_with(move |_req: &wiremock::Request| {
            if attempt_count_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                ResponseTemplate::new(409).set_body_string("Conflict")
            } else {
                ResponseTemplate::new(200).set_body_json(location())
            }
        })
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .service_url(mock_server.uri())
        .unwrap()
        .authenticator(Arc::new(NoAuthAuthenticator))
        .retry_strategy(RetryStrategy::Linear {
            delay: Duration::from_millis(10),
            max_retries: 2,
        })
        .retry_predicate(Box::new(RetryOnStatus(vec![409])))
        .build()
        .unwrap();

    let response = client
        .call::<Location>(get("/v2/agents/a-1/health"))
        .await
        .unwrap();

    assert_eq!(response.attempts, 2);
    assert_eq!(attempt_count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_retry_after_header_is_honoured() {
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();

    Mock::given(method("GET"))
        .and(path("/v2/jobs"))
        .respond_with(move |_req: &wiremock::Request| {
            if attempt_count_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                ResponseTemplate::new(429)
                    .set_body_string("Too many requests")
                    .insert_header("retry-after", "1")
            } else {
                ResponseTemplate::new(200).set_body_json(location())
            }
        })
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .service_url(mock_server.uri())
        .unwrap()
        .authenticator(Arc::new(NoAuthAuthenticator))
        .retry_strategy(RetryStrategy::Linear {
            delay: Duration::from_millis(10),
            max_retries: 2,
        })
        .build()
        .unwrap();

    let start = Instant::now();
    let response = client.call::<Location>(get("/v2/jobs")).await.unwrap();

    assert_eq!(response.attempts, 2);
    assert!(start.elapsed() >= Duration::from_secs(1));
}

#[tokio::test]
async fn test_retry_after_is_capped_by_max_wait() {
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();

    Mock::given(method("GET"))
        .and(path("/v2/jobs"))
        .respond_with(move |_req: &wiremock::Request| {
            if attempt_count_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                ResponseTemplate::new(429).insert_header("retry-after", "600")
            } else {
                ResponseTemplate::new(200).set_body_json(location())
            }
        })
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .service_url(mock_server.uri())
        .unwrap()
        .authenticator(Arc::new(NoAuthAuthenticator))
        .retry_strategy(RetryStrategy::Linear {
            delay: Duration::from_millis(10),
            max_retries: 2,
        })
        .rate_limit_config(RateLimitConfig::default().with_max_wait(Duration::from_millis(50)))
        .build()
        .unwrap();

    let start = Instant::now();
    let response = client.call::<Location>(get("/v2/jobs")).await.unwrap();

    assert_eq!(response.attempts, 2);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_rate_limit_info_on_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/jobs"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "30")
                .insert_header("x-ratelimit-remaining", "0"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let error = client.call::<Location>(get("/v2/jobs")).await.unwrap_err();

    let info = error.rate_limit_info().unwrap();
    assert_eq!(info.retry_after, Some(Duration::from_secs(30)));
    assert_eq!(info.remaining, Some(0));
    assert!(error.is_retryable());
}

#[tokio::test]
async fn test_rate_limit_disabled_ignores_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/jobs"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .service_url(mock_server.uri())
        .unwrap()
        .authenticator(Arc::new(NoAuthAuthenticator))
        .rate_limit_config(RateLimitConfig::disabled())
        .build()
        .unwrap();

    let error = client.call::<Location>(get("/v2/jobs")).await.unwrap_err();
    assert!(error.rate_limit_info().is_none());
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/version"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(location())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .service_url(mock_server.uri())
        .unwrap()
        .authenticator(Arc::new(NoAuthAuthenticator))
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let result = client.call::<Location>(get("/v1/version")).await;

    match result {
        Err(Error::Timeout) => {}
        _ => panic!("Expected Timeout, got {:?}", result),
    }
}

#[tokio::test]
async fn test_network_error() {
    let client = Client::builder()
        .service_url("http://127.0.0.1:1")
        .unwrap()
        .authenticator(Arc::new(NoAuthAuthenticator))
        .build()
        .unwrap();

    let result = client.call::<Location>(get("/v1/version")).await;

    match result {
        Err(Error::Network(_)) => {}
        _ => panic!("Expected Network error, got {:?}", result),
    }
}

#[test]
fn test_builder_requires_url_and_authenticator() {
    let missing_url = Client::builder()
        .authenticator(Arc::new(NoAuthAuthenticator))
        .build();
    assert!(matches!(missing_url, Err(Error::Configuration(_))));

    let missing_auth = Client::builder()
        .service_url("https://schematics.cloud.ibm.com")
        .unwrap()
        .build();
    assert!(matches!(missing_auth, Err(Error::Configuration(_))));

    assert!(matches!(
        Client::builder().service_url("not a url"),
        Err(Error::InvalidUrl(_))
    ));
}
