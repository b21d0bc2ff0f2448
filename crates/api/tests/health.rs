//! Integration tests for the health endpoint and general HTTP behaviour.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, send};

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let app = common::build_test_app();
    let response = send(app, Method::GET, "/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["storeHealthy"], true);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app();
    let response = send(app, Method::GET, "/this-route-does-not-exist", None, None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app();
    let response = send(app, Method::GET, "/health", None, None).await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("response must contain an x-request-id header");

    // UUID: 36 chars with hyphens.
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}
