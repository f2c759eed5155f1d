//! Integration tests for the drive adapters against a mock HTTP server
//!
//! Covers the connection probe classification (connected / recoverable /
//! suspended / fatal), proactive token refresh, and the multipart upload
//! task. No test touches the real network: API and token endpoints are
//! wiremock mounts, tokens live in `MemoryTokenStorage`.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lnxpush_core::domain::connection::ConnectionEvent;
use lnxpush_core::domain::newtypes::FolderId;
use lnxpush_core::ports::cloud_connection::ICloudConnection;
use lnxpush_core::ports::upload_task::IUploadTask;
use lnxpush_drive::auth::DriveOAuthConfig;
use lnxpush_drive::{
    DriveAuthenticator, DriveConnection, DriveUploadTask, ITokenStorage, MemoryTokenStorage, Tokens,
};

const ACCOUNT: &str = "user@example.com";

/// Fresh tokens that will not need a refresh
fn valid_tokens() -> Tokens {
    Tokens {
        access_token: "valid-access-token".to_string(),
        refresh_token: Some("refresh-token".to_string()),
        expires_at: Utc::now() + chrono::Duration::hours(1),
    }
}

/// Tokens past their expiry, refreshable
fn expired_tokens() -> Tokens {
    Tokens {
        access_token: "stale-access-token".to_string(),
        refresh_token: Some("refresh-token".to_string()),
        expires_at: Utc::now() - chrono::Duration::minutes(1),
    }
}

/// Builds an authenticator whose token endpoint points at the mock server
fn authenticator(server: &MockServer, storage: Arc<MemoryTokenStorage>) -> Arc<DriveAuthenticator> {
    let config = DriveOAuthConfig::new("test-app-id").with_endpoints(
        format!("{}/auth", server.uri()),
        format!("{}/token", server.uri()),
    );
    Arc::new(DriveAuthenticator::new(config, storage))
}

/// Mounts a successful `about` endpoint
async fn mount_about_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user": {
                "displayName": "Test User",
                "emailAddress": ACCOUNT,
            }
        })))
        .mount(server)
        .await;
}

/// Runs one connection probe and returns the resulting event
async fn probe(server: &MockServer, storage: Arc<MemoryTokenStorage>) -> (ConnectionEvent, bool) {
    let (event_tx, mut event_rx) = mpsc::channel(4);
    let connection = DriveConnection::new(authenticator(server, storage), ACCOUNT, event_tx)
        .with_api_base(server.uri());

    connection.connect().await.unwrap();

    let event = tokio::time::timeout(Duration::from_secs(5), event_rx.recv())
        .await
        .expect("Probe should report an event")
        .expect("Event channel should stay open");

    (event, connection.is_connected())
}

// ============================================================================
// Connection probe tests
// ============================================================================

#[tokio::test]
async fn test_probe_with_valid_token_connects() {
    let server = MockServer::start().await;
    mount_about_ok(&server).await;

    let storage = Arc::new(MemoryTokenStorage::default());
    storage.store(ACCOUNT, &valid_tokens()).unwrap();

    let (event, is_connected) = probe(&server, storage).await;
    assert_eq!(event, ConnectionEvent::Connected);
    assert!(is_connected);
}

#[tokio::test]
async fn test_probe_unauthorized_fails_recoverably() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid Credentials"))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryTokenStorage::default());
    storage.store(ACCOUNT, &valid_tokens()).unwrap();

    let (event, is_connected) = probe(&server, storage).await;
    assert!(!is_connected);

    match event {
        ConnectionEvent::Failed(failure) => {
            assert!(failure.has_resolution());
            let handle = failure.resolution.unwrap();
            assert!(handle.as_str().contains("/auth"));
            assert!(handle.as_str().contains("code_challenge"));
        }
        other => panic!("Expected recoverable failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_probe_server_error_suspends() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Backend Error"))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryTokenStorage::default());
    storage.store(ACCOUNT, &valid_tokens()).unwrap();

    let (event, is_connected) = probe(&server, storage).await;
    assert_eq!(event, ConnectionEvent::Suspended(503));
    assert!(!is_connected);
}

#[tokio::test]
async fn test_probe_without_tokens_needs_authorization() {
    let server = MockServer::start().await;
    // No `about` mount: the probe must not reach the API at all

    let (event, is_connected) = probe(&server, Arc::new(MemoryTokenStorage::default())).await;
    assert!(!is_connected);

    match event {
        ConnectionEvent::Failed(failure) => {
            assert!(failure.has_resolution());
            assert!(failure.reason.contains("authorization required"));
        }
        other => panic!("Expected recoverable failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_probe_refreshes_expired_token() {
    let server = MockServer::start().await;
    mount_about_ok(&server).await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "fresh-access-token",
            "token_type": "Bearer",
            "expires_in": 3600,
        })))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryTokenStorage::default());
    storage.store(ACCOUNT, &expired_tokens()).unwrap();

    let (event, is_connected) = probe(&server, Arc::clone(&storage)).await;
    assert_eq!(event, ConnectionEvent::Connected);
    assert!(is_connected);

    // The refreshed token was persisted, keeping the old refresh token
    let refreshed = storage.load(ACCOUNT).unwrap().unwrap();
    assert_eq!(refreshed.access_token, "fresh-access-token");
    assert_eq!(refreshed.refresh_token.as_deref(), Some("refresh-token"));
    assert!(!refreshed.is_expired());
}

#[tokio::test]
async fn test_probe_rejected_refresh_fails_recoverably() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
        })))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryTokenStorage::default());
    storage.store(ACCOUNT, &expired_tokens()).unwrap();

    let (event, is_connected) = probe(&server, storage).await;
    assert!(!is_connected);

    match event {
        ConnectionEvent::Failed(failure) => {
            assert!(failure.has_resolution());
            assert!(failure.reason.contains("token refresh rejected"));
        }
        other => panic!("Expected recoverable failure, got {other:?}"),
    }
}

// ============================================================================
// Upload task tests
// ============================================================================

#[tokio::test]
async fn test_upload_sends_multipart_and_reports_progress() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .and(query_param("uploadType", "multipart"))
        .and(body_string_contains(r#""name":"log.csv""#))
        .and(body_string_contains(r#""parents":["F1"]"#))
        .and(body_string_contains("a,b,c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "file-001",
            "name": "log.csv",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryTokenStorage::default());
    storage.store(ACCOUNT, &valid_tokens()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let local_path = dir.path().join("log.csv");
    std::fs::write(&local_path, "a,b,c").unwrap();

    let task = DriveUploadTask::new(authenticator(&server, storage), ACCOUNT)
        .with_base_urls(server.uri(), server.uri());

    let reported = Arc::new(AtomicU64::new(0));
    let reported_clone = Arc::clone(&reported);

    task.start(
        "log.csv",
        &local_path,
        &FolderId::new("F1").unwrap(),
        Some(Box::new(move |sent, total| {
            assert_eq!(total, 5);
            reported_clone.store(sent, Ordering::Release);
        })),
    )
    .await
    .unwrap();

    // The last progress report covers the whole file
    assert_eq!(reported.load(Ordering::Acquire), 5);
}

#[tokio::test]
async fn test_upload_missing_local_file_fails() {
    let server = MockServer::start().await;

    let storage = Arc::new(MemoryTokenStorage::default());
    storage.store(ACCOUNT, &valid_tokens()).unwrap();

    let task = DriveUploadTask::new(authenticator(&server, storage), ACCOUNT)
        .with_base_urls(server.uri(), server.uri());

    let result = task
        .start(
            "log.csv",
            std::path::Path::new("/nonexistent/log.csv"),
            &FolderId::new("F1").unwrap(),
            None,
        )
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_upload_api_rejection_surfaces_as_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(403).set_body_string("insufficient permissions"))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryTokenStorage::default());
    storage.store(ACCOUNT, &valid_tokens()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let local_path = dir.path().join("log.csv");
    std::fs::write(&local_path, "a,b,c").unwrap();

    let task = DriveUploadTask::new(authenticator(&server, storage), ACCOUNT)
        .with_base_urls(server.uri(), server.uri());

    let result = task
        .start("log.csv", &local_path, &FolderId::new("F1").unwrap(), None)
        .await;

    assert!(result.is_err());
    assert!(format!("{:#}", result.unwrap_err()).contains("403"));
}

#[tokio::test]
async fn test_upload_without_tokens_fails() {
    let server = MockServer::start().await;

    let dir = tempfile::tempdir().unwrap();
    let local_path = dir.path().join("log.csv");
    std::fs::write(&local_path, "a,b,c").unwrap();

    let task = DriveUploadTask::new(
        authenticator(&server, Arc::new(MemoryTokenStorage::default())),
        ACCOUNT,
    )
    .with_base_urls(server.uri(), server.uri());

    let result = task
        .start("log.csv", &local_path, &FolderId::new("F1").unwrap(), None)
        .await;

    assert!(result.is_err());
}
