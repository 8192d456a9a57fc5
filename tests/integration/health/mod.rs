//! Health route integration tests

use axum::http::{header::CONTENT_TYPE, Method, StatusCode};
use serde_json::json;

use crate::common::{parse_body, plain_request, TestApp};

#[tokio::test]
async fn test_health_reports_ok() {
    let app = TestApp::new();

    let resp = app.call(plain_request(Method::GET, "/health", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_TYPE], "application/json; charset=utf-8");
    assert_eq!(parse_body(resp).await, json!({"status": "OK"}));
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let app = TestApp::new();
    app.resolver.fail_with("identity service down");

    let resp = app.call(plain_request(Method::GET, "/health", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new();

    let resp = app.call(plain_request(Method::GET, "/dialogs", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
