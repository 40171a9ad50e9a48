//! Authentication tests: IAM token exchange and the static schemes, against
//! a wiremock token service and API.

use schematics::auth::{
    Authenticator, BasicAuthenticator, BearerTokenAuthenticator, IamAuthenticator,
    NoAuthAuthenticator,
};
use schematics::config::ServiceProperties;
use schematics::service::GetSchematicsVersionOptions;
use schematics::{Error, SchematicsV1, SchematicsV1Options};
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(mock_server: &MockServer, authenticator: Arc<dyn Authenticator>) -> SchematicsV1 {
    SchematicsV1::new(SchematicsV1Options {
        url: Some(mock_server.uri()),
        authenticator: Some(authenticator),
        ..Default::default()
    })
    .unwrap()
}

async fn mount_token(mock_server: &MockServer, token: &str, expires_in: u64, times: u64) {
    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("apikey=my-api-key"))
        .and(body_string_contains(
            "grant_type=urn%3Aibm%3Aparams%3Aoauth%3Agrant-type%3Aapikey",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": token,
            "refresh_token": "not-used",
            "token_type": "Bearer",
            "expires_in": expires_in
        })))
        .expect(times)
        .mount(mock_server)
        .await;
}

async fn mount_version(mock_server: &MockServer, authorization: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/version"))
        .and(header("authorization", authorization))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "buildno": "42"
        })))
        .expect(times)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_iam_exchanges_api_key_and_caches_token() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server, "iam-token-1", 3600, 1).await;
    mount_version(&mock_server, "Bearer iam-token-1", 2).await;

    let authenticator = IamAuthenticator::builder("my-api-key")
        .url(mock_server.uri())
        .unwrap()
        .build()
        .unwrap();
    let service = service(&mock_server, Arc::new(authenticator));

    let options = GetSchematicsVersionOptions::new();
    let first = service.get_schematics_version(&options).await.unwrap();
    let second = service.get_schematics_version(&options).await.unwrap();

    assert_eq!(first.buildno.as_deref(), Some("42"));
    assert_eq!(second.status_code(), 200);
}

#[tokio::test]
async fn test_iam_refreshes_expired_token() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server, "short-lived", 0, 2).await;

    let authenticator = IamAuthenticator::builder("my-api-key")
        .url(format!("{}/identity/token", mock_server.uri()))
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(
        authenticator.token_url().as_str(),
        format!("{}/identity/token", mock_server.uri())
    );
    assert_eq!(authenticator.access_token().await.unwrap(), "short-lived");
    assert_eq!(authenticator.access_token().await.unwrap(), "short-lived");
}

#[tokio::test]
async fn test_iam_reuses_token_with_only_absolute_expiration() {
    let mock_server = MockServer::start().await;
    let expiration = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
        + 3600;

    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "long-lived",
            "token_type": "Bearer",
            "expiration": expiration
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let authenticator = IamAuthenticator::builder("my-api-key")
        .url(mock_server.uri())
        .unwrap()
        .build()
        .unwrap();

    for _ in 0..3 {
        assert_eq!(authenticator.access_token().await.unwrap(), "long-lived");
    }
}

#[tokio::test]
async fn test_iam_client_credentials_and_scope() {
    let mock_server = MockServer::start().await;

    // base64("bx:bx")
    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .and(header("authorization", "Basic Yng6Yng="))
        .and(body_string_contains("scope=schematics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "scoped",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let authenticator = IamAuthenticator::builder("my-api-key")
        .url(mock_server.uri())
        .unwrap()
        .client_credentials("bx", "bx")
        .scope("schematics")
        .build()
        .unwrap();

    assert_eq!(authenticator.access_token().await.unwrap(), "scoped");
}

#[tokio::test]
async fn test_iam_rejection_is_an_authentication_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "errorCode": "BXNIM0415E",
            "errorMessage": "Provided API key could not be found"
        })))
        .mount(&mock_server)
        .await;
    mount_version(&mock_server, "Bearer never", 0).await;

    let authenticator = IamAuthenticator::builder("my-api-key")
        .url(mock_server.uri())
        .unwrap()
        .build()
        .unwrap();
    let service = service(&mock_server, Arc::new(authenticator));

    let result = service
        .get_schematics_version(&GetSchematicsVersionOptions::new())
        .await;

    match result {
        Err(Error::Authentication(ref message)) => {
            assert!(message.contains("400"));
            assert!(!message.contains("my-api-key"));
        }
        _ => panic!("Expected Authentication error, got {:?}", result),
    }
}

#[tokio::test]
async fn test_iam_unreadable_token_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let authenticator = IamAuthenticator::builder("my-api-key")
        .url(mock_server.uri())
        .unwrap()
        .build()
        .unwrap();

    let result = authenticator.access_token().await;
    assert!(matches!(result, Err(Error::Authentication(_))));
}

#[tokio::test]
async fn test_bearer_token_header() {
    let mock_server = MockServer::start().await;
    mount_version(&mock_server, "Bearer static-token", 1).await;

    let service = service(
        &mock_server,
        Arc::new(BearerTokenAuthenticator::new("static-token").unwrap()),
    );
    service
        .get_schematics_version(&GetSchematicsVersionOptions::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_basic_auth_header() {
    let mock_server = MockServer::start().await;
    // base64("user:pass")
    mount_version(&mock_server, "Basic dXNlcjpwYXNz", 1).await;

    let service = service(
        &mock_server,
        Arc::new(BasicAuthenticator::new("user", "pass").unwrap()),
    );
    service
        .get_schematics_version(&GetSchematicsVersionOptions::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_no_auth_sends_no_authorization_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/version"))
        .respond_with(move |req: &wiremock::Request| {
            if req.headers.contains_key("authorization") {
                ResponseTemplate::new(401)
            } else {
                ResponseTemplate::new(200).set_body_json(serde_json::json!({}))
            }
        })
        .mount(&mock_server)
        .await;

    let service = service(&mock_server, Arc::new(NoAuthAuthenticator));
    let response = service
        .get_schematics_version(&GetSchematicsVersionOptions::new())
        .await
        .unwrap();
    assert_eq!(response.status_code(), 200);
}

#[test]
fn test_static_authenticators_reject_empty_credentials() {
    assert!(matches!(
        BearerTokenAuthenticator::new(" "),
        Err(Error::Configuration(_))
    ));
    assert!(matches!(
        BasicAuthenticator::new("", "pass"),
        Err(Error::Configuration(_))
    ));
    assert!(matches!(
        IamAuthenticator::builder("").build(),
        Err(Error::Configuration(_))
    ));
}

#[tokio::test]
async fn test_service_from_properties_uses_configured_iam() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server, "configured-token", 3600, 1).await;
    mount_version(&mock_server, "Bearer configured-token", 1).await;

    let properties = ServiceProperties::from_pairs(
        "schematics",
        [
            ("SCHEMATICS_URL", mock_server.uri()),
            ("SCHEMATICS_APIKEY", "my-api-key".to_string()),
            ("SCHEMATICS_AUTH_URL", mock_server.uri()),
            ("OTHER_APIKEY", "ignored".to_string()),
        ],
    );
    let service = SchematicsV1::from_properties(SchematicsV1Options::default(), &properties).unwrap();

    assert_eq!(service.service_url().as_str(), format!("{}/", mock_server.uri()));
    service
        .get_schematics_version(&GetSchematicsVersionOptions::new())
        .await
        .unwrap();
}
