//! HTTP API tests
//!
//! Exercises the routing and validation layer against a dispatcher built
//! from an unavailable resolution, which verifies the two paths that must
//! never touch a model: missing input and the bypassed-resolution guard.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use moodline_classifiers::{InferenceDispatcher, Resolution};
use moodline_server::routes::{create_router, AppState};
use std::sync::Arc;
use tower::ServiceExt;

fn test_router() -> axum::Router {
    let dispatcher = InferenceDispatcher::new(Arc::new(Resolution::unavailable()));
    create_router(AppState::new(dispatcher))
}

fn json_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_endpoint_is_alive() {
    let response = test_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_json_is_a_client_error_with_error_body() {
    let response = test_router()
        .oneshot(json_request(r#"{"title": "unterminated"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}

#[tokio::test]
async fn missing_title_is_a_client_error() {
    let response = test_router().oneshot(json_request("{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing 'title' in request");
}

#[tokio::test]
async fn bypassed_resolution_is_a_server_error() {
    let response = test_router()
        .oneshot(json_request(r#"{"title": "This is great"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("model is not initialized"));
}

#[tokio::test]
async fn extra_fields_are_tolerated() {
    // Clients may send more than the required field; only `title` matters.
    let response = test_router()
        .oneshot(json_request(r#"{"title": "ok", "keyword": "rust"}"#))
        .await
        .unwrap();

    // Unavailable backend: the request is well-formed, so this is the
    // server-side path, not validation.
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
