#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use grantboard_api::auth::jwt::{generate_access_token, JwtConfig};
use grantboard_api::config::ServerConfig;
use grantboard_api::router::build_app_router;
use grantboard_api::state::AppState;
use grantboard_db::MemoryDashboardStore;
use grantboard_events::EventHooks;
use http_body_util::BodyExt;
use tower::ServiceExt;

const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        hook_queue_capacity: 64,
        database_url: None,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// Uses the same [`build_app_router`] as the binary so tests exercise the
/// production middleware stack.
pub fn build_test_app() -> Router {
    build_test_app_with_hooks(Arc::new(EventHooks::default()))
}

/// Like [`build_test_app`] but with caller-owned hooks, so tests can observe
/// emitted events.
pub fn build_test_app_with_hooks(hooks: Arc<EventHooks>) -> Router {
    let config = test_config();
    let state = AppState {
        store: Arc::new(MemoryDashboardStore::new()),
        config: Arc::new(config.clone()),
        hooks,
    };
    build_app_router(state, &config)
}

/// Issue a bearer token signed with the test secret.
pub fn token(user_id: i64, role: &str, capabilities: &[&str]) -> String {
    generate_access_token(user_id, "Test User", role, capabilities, &test_config().jwt)
        .expect("token generation should succeed")
}

/// Send a request through the router, optionally authenticated and with a
/// JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
