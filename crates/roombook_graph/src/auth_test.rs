use chrono::{Duration, Utc};
use roombook_config::GraphConfig;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::auth::{
    CachingTokenProvider, ClientCredentialsProvider, Credential, MockTokenProvider, TokenProvider,
};
use crate::error::AuthError;
use crate::test_support::{create_mock_config, mount_token_failure, TOKEN_PATH};

fn provider_for(config: &GraphConfig) -> ClientCredentialsProvider {
    ClientCredentialsProvider::new(config, reqwest::Client::new())
}

#[tokio::test]
async fn test_acquire_posts_client_credentials_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=client-1"))
        .and(body_string_contains("client_secret=shh"))
        .and(body_string_contains(
            "scope=https%3A%2F%2Fgraph.microsoft.com%2F.default",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3600,
            "access_token": "tok123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_mock_config(&server);
    let provider = provider_for(&config.graph);
    assert_eq!(provider.token_url(), format!("{}{}", server.uri(), TOKEN_PATH));

    let credential = provider.acquire().await.unwrap();
    assert_eq!(credential.access_token, "tok123");
    assert_eq!(credential.bearer(), "Bearer tok123");
    assert!(credential.is_fresh_at(Utc::now()));
}

#[tokio::test]
async fn test_each_acquire_fetches_a_new_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access_token": "tok", "expires_in": 3600 })),
        )
        .expect(2)
        .mount(&server)
        .await;

    let config = create_mock_config(&server);
    let provider = provider_for(&config.graph);
    provider.acquire().await.unwrap();
    provider.acquire().await.unwrap();
}

#[tokio::test]
async fn test_rejected_identity_keeps_status_and_body() {
    let server = MockServer::start().await;
    mount_token_failure(&server).await;

    let config = create_mock_config(&server);
    let err = provider_for(&config.graph).acquire().await.unwrap_err();

    match err {
        AuthError::Rejected { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("invalid_client"));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_access_token_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token_type": "Bearer" })))
        .mount(&server)
        .await;

    let config = create_mock_config(&server);
    let err = provider_for(&config.graph).acquire().await.unwrap_err();
    assert!(matches!(err, AuthError::MissingAccessToken));
}

#[tokio::test]
async fn test_non_json_token_response_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let config = create_mock_config(&server);
    let err = provider_for(&config.graph).acquire().await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_unreachable_identity_service() {
    let config = GraphConfig {
        tenant_id: "tenant-1".to_string(),
        authority_host: "http://127.0.0.1:1".to_string(),
        ..GraphConfig::default()
    };
    let err = provider_for(&config).acquire().await.unwrap_err();
    assert!(matches!(err, AuthError::Unreachable(_)));
}

async fn acquire_with_expiry(expires_in: serde_json::Value) -> Credential {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok123",
            "expires_in": expires_in
        })))
        .mount(&server)
        .await;

    let config = create_mock_config(&server);
    provider_for(&config.graph).acquire().await.unwrap()
}

#[tokio::test]
async fn test_string_expires_in_is_accepted() {
    let credential = acquire_with_expiry(json!("3599")).await;
    assert_eq!(credential.access_token, "tok123");
    let expires_at = credential.expires_at.expect("expiry parsed from string");
    assert!(expires_at > Utc::now() + Duration::seconds(3500));
}

#[tokio::test]
async fn test_unrepresentable_expires_in_drops_expiry() {
    let credential = acquire_with_expiry(json!(9_000_000_000_000_000_i64)).await;
    assert_eq!(credential.access_token, "tok123");
    assert_eq!(credential.expires_at, None);

    let credential = acquire_with_expiry(json!(i64::MAX)).await;
    assert_eq!(credential.expires_at, None);
}

#[tokio::test]
async fn test_malformed_expires_in_is_ignored() {
    let credential = acquire_with_expiry(json!("soon")).await;
    assert_eq!(credential.access_token, "tok123");
    assert_eq!(credential.expires_at, None);

    let credential = acquire_with_expiry(json!({ "seconds": 60 })).await;
    assert_eq!(credential.expires_at, None);
}

#[tokio::test]
async fn test_cache_reuses_fresh_credential() {
    let mut inner = MockTokenProvider::new();
    inner
        .expect_acquire()
        .times(1)
        .returning(|| Ok(Credential::new("cached", Some(Utc::now() + Duration::hours(1)))));

    let provider = CachingTokenProvider::new(inner);
    let first = provider.acquire().await.unwrap();
    let second = provider.acquire().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_cache_refetches_inside_expiry_skew() {
    let mut inner = MockTokenProvider::new();
    inner
        .expect_acquire()
        .times(2)
        .returning(|| Ok(Credential::new("short", Some(Utc::now() + Duration::seconds(30)))));

    let provider = CachingTokenProvider::new(inner);
    provider.acquire().await.unwrap();
    provider.acquire().await.unwrap();
}

#[tokio::test]
async fn test_cache_skips_credentials_without_expiry() {
    let mut inner = MockTokenProvider::new();
    inner
        .expect_acquire()
        .times(2)
        .returning(|| Ok(Credential::new("no-expiry", None)));

    let provider = CachingTokenProvider::new(inner);
    provider.acquire().await.unwrap();
    provider.acquire().await.unwrap();
}

#[tokio::test]
async fn test_cache_does_not_store_failures() {
    let mut inner = MockTokenProvider::new();
    let mut calls = 0;
    inner.expect_acquire().times(2).returning(move || {
        calls += 1;
        if calls == 1 {
            Err(AuthError::MissingAccessToken)
        } else {
            Ok(Credential::new("second", Some(Utc::now() + Duration::hours(1))))
        }
    });

    let provider = CachingTokenProvider::new(inner);
    assert!(provider.acquire().await.is_err());
    assert_eq!(provider.acquire().await.unwrap().access_token, "second");
}

#[test]
fn test_credential_debug_redacts_token() {
    let credential = Credential::new("very-secret", None);
    let rendered = format!("{credential:?}");
    assert!(!rendered.contains("very-secret"));
    assert!(rendered.contains("<redacted>"));
}
