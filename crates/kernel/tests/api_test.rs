#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Public API tests for requests resolved before any query.

mod common;

use axum::http::StatusCode;
use vitrine_test_utils::assert;

use common::{TestApp, body_json};

#[tokio::test]
async fn unknown_language_is_not_found() {
    let app = TestApp::new();

    for uri in [
        "/api/xx/pages/",
        "/api/xx/page/about/",
        "/api/xx/products/",
        "/api/xx/product/runner/",
        "/api/xx/categories/",
        "/api/xx/category/shoes/",
        "/api/xx/category/shoes/products/",
        "/api/xx/tags/summer/",
        "/api/xx/menuitems/",
        "/api/xx/homepage/",
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        let body = body_json(response).await;
        assert::detail_eq(&body, "Not found.");
    }
}

#[tokio::test]
async fn unrouted_path_is_not_found() {
    let app = TestApp::new();

    let response = app.get("/api/en/unknown/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_is_not_reachable_without_token() {
    let app = TestApp::new();

    let response = app.get("/admin/").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
