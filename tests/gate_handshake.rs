//! Handshake gate integration tests
//!
//! Runs the server on an ephemeral port and drives real upgrade requests
//! at the WebSocket route, asserting that unauthorized attempts are
//! rejected before any hub state is created.
//!
//! The upgrade attempts are written as raw HTTP: the WebSocket extractor
//! only engages on a genuinely upgradable connection, so an in-process
//! `oneshot` request cannot reach the gate.

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tower::ServiceExt;
use uuid::Uuid;

use palaver::realtime::hub::{Hub, HubHandle};
use palaver::routes::router::create_router;
use palaver::server::config::OriginPolicy;
use palaver::server::state::AppState;

const TEST_SECRET: &str = "handshake-test-secret";

#[derive(Serialize)]
struct TestClaims {
    sub: String,
    email: String,
    exp: u64,
    iat: u64,
}

fn sign_token(sub: String, issued: u64, expires: u64) -> String {
    std::env::set_var("JWT_SECRET", TEST_SECRET);
    let claims = TestClaims {
        sub,
        email: "test@example.com".to_string(),
        exp: expires,
        iat: issued,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_ref()),
    )
    .unwrap()
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn test_state(origin_policy: OriginPolicy) -> (AppState, HubHandle) {
    let (hub, handle) = Hub::new();
    tokio::spawn(hub.run());
    (
        AppState {
            db_pool: None,
            hub: handle.clone(),
            origin_policy,
        },
        handle,
    )
}

/// Serve the app on an ephemeral port; returns its address and the hub
async fn spawn_server(origin_policy: OriginPolicy) -> (SocketAddr, HubHandle) {
    let (state, hub) = test_state(origin_policy);
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, hub)
}

/// Issue a raw WebSocket upgrade request and return the response status
async fn handshake_status(addr: SocketAddr, path: &str, origin: Option<&str>) -> u16 {
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let origin_header = origin
        .map(|o| format!("Origin: {o}\r\n"))
        .unwrap_or_default();
    let request = format!(
        "GET {path} HTTP/1.1\r\n\
         Host: localhost\r\n\
         Connection: Upgrade\r\n\
         Upgrade: websocket\r\n\
         Sec-WebSocket-Version: 13\r\n\
         Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
         {origin_header}\r\n"
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    // Read until the status line is in; the server answers promptly
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(2).any(|w| w == b"\r\n") {
            break;
        }
    }

    let head = String::from_utf8_lossy(&buf);
    head.split_whitespace()
        .nth(1)
        .expect("status line")
        .parse()
        .expect("numeric status")
}

#[tokio::test]
async fn expired_token_is_rejected_before_upgrade() {
    let (addr, hub) = spawn_server(OriginPolicy::AllowAny).await;

    let now = now_secs();
    let token = sign_token(Uuid::new_v4().to_string(), now - 7200, now - 3600);

    let status = handshake_status(addr, &format!("/ws/{token}/general"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED.as_u16());

    // No client was constructed, no loops spawned
    assert_eq!(hub.client_count().await, 0);
}

#[tokio::test]
async fn malformed_token_is_rejected_before_upgrade() {
    let (addr, hub) = spawn_server(OriginPolicy::AllowAny).await;

    let status = handshake_status(addr, "/ws/not-a-token/general", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED.as_u16());
    assert_eq!(hub.client_count().await, 0);
}

#[tokio::test]
async fn token_with_non_uuid_subject_is_rejected() {
    let (addr, hub) = spawn_server(OriginPolicy::AllowAny).await;

    let now = now_secs();
    let token = sign_token("not-a-uuid".to_string(), now, now + 3600);

    let status = handshake_status(addr, &format!("/ws/{token}/general"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED.as_u16());
    assert_eq!(hub.client_count().await, 0);
}

#[tokio::test]
async fn disallowed_origin_is_rejected() {
    let policy = OriginPolicy::Allowlist(vec!["https://app.example.com".to_string()]);
    let (addr, hub) = spawn_server(policy).await;

    let now = now_secs();
    let token = sign_token(Uuid::new_v4().to_string(), now, now + 3600);

    let status = handshake_status(
        addr,
        &format!("/ws/{token}/general"),
        Some("https://evil.example.com"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN.as_u16());
    assert_eq!(hub.client_count().await, 0);
}

#[tokio::test]
async fn missing_origin_is_rejected_when_allowlist_configured() {
    let policy = OriginPolicy::Allowlist(vec!["https://app.example.com".to_string()]);
    let (addr, hub) = spawn_server(policy).await;

    let now = now_secs();
    let token = sign_token(Uuid::new_v4().to_string(), now, now + 3600);

    let status = handshake_status(addr, &format!("/ws/{token}/general"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN.as_u16());
    assert_eq!(hub.client_count().await, 0);
}

#[tokio::test]
async fn valid_token_without_database_is_service_unavailable() {
    // Origin and credential both pass; subject resolution needs the
    // store, which this server runs without
    let (addr, hub) = spawn_server(OriginPolicy::AllowAny).await;

    let now = now_secs();
    let token = sign_token(Uuid::new_v4().to_string(), now, now + 3600);

    let status = handshake_status(addr, &format!("/ws/{token}/general"), None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE.as_u16());
    assert_eq!(hub.client_count().await, 0);
}

#[tokio::test]
async fn health_reports_connection_count() {
    let (state, _hub) = test_state(OriginPolicy::AllowAny);
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["clients"], 0);
}

#[tokio::test]
async fn unknown_route_falls_back_to_404() {
    let (state, _hub) = test_state(OriginPolicy::AllowAny);
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&bytes[..], b"404 Not Found");
}
