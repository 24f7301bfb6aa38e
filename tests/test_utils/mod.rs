//! Test utilities for integration tests
#![allow(dead_code)]
use std::sync::Arc;

use axum::{Router, body::Body};
use chrono::{Duration, Utc};

use nietu::ai::gateway::{GatewayConfig, Upstream};
use nietu::api::{AppState, app};
use nietu::auth::{DEFAULT_MAX_AGE_SECS, SessionClaims, sign};
use nietu::core::AppConfig;

pub const TEST_SECRET: &str = "test-session-secret";
pub const GEMINI_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

/// Config pointing the gateway at a Gemini style upstream served by
/// `upstream_url` (usually a `mockito` server).
pub fn test_config(upstream_url: &str, api_key: Option<&str>) -> AppConfig {
    AppConfig {
        gateway: GatewayConfig::new(
            Upstream::Gemini,
            &format!("{}{}", upstream_url, GEMINI_PATH),
            api_key,
        ),
        session_secret: String::from(TEST_SECRET),
        github_client_id: String::from("test_client_id"),
        github_client_secret: String::from("test_client_secret"),
        public_url: String::from("http://localhost:3000"),
        assistant_name: String::from("Nietu AI"),
    }
}

/// Creates a test application router
pub fn test_app(upstream_url: &str, api_key: Option<&str>) -> Router {
    test_app_with_config(test_config(upstream_url, api_key))
}

pub fn test_app_with_config(config: AppConfig) -> Router {
    app(Arc::new(AppState::new(config)))
}

/// A valid session token for a user called Ada
pub fn session_token() -> String {
    let claims = SessionClaims::new("12345", Utc::now(), Duration::seconds(DEFAULT_MAX_AGE_SECS))
        .name(Some("Ada"))
        .email(Some("ada@example.com"));
    sign(&claims, TEST_SECRET).unwrap()
}

/// Serve the app on a random local port and return its base URL
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn gemini_reply(text: &str) -> String {
    serde_json::json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
    })
    .to_string()
}
