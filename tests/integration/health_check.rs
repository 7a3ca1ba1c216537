// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::article_html;
use super::helpers::create_test_app;
use super::helpers::fake_browser::FakeBrowser;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use pagedigest::config::settings::ResponseMode;
use pagedigest::domain::models::crawl_request::CrawlRequest;
use serde_json::Value;
use tower::util::ServiceExt;

async fn get(router: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

/// 健康检查测试
///
/// 浏览器尚未启动时也应返回 200
#[tokio::test]
async fn health_check_works_before_launch() {
    let app = create_test_app(FakeBrowser::serving(article_html()), ResponseMode::Async);

    let (status, body) = get(app.router.clone(), "/health").await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
    assert_eq!(body["browser"]["initialized"], false);
    assert_eq!(body["browser"]["requestCount"], 0);
    assert_eq!(body["browser"]["maxRequests"], 100);
    assert_eq!(body["browser"]["maxAgeMinutes"], 60);
    assert_eq!(body["config"]["responseMode"], "async");
}

#[tokio::test]
async fn health_check_reflects_browser_usage() {
    let app = create_test_app(FakeBrowser::serving(article_html()), ResponseMode::Sync);
    app.pipeline
        .run(CrawlRequest::test("https://example.com/bridge"))
        .await
        .unwrap();

    let (_, body) = get(app.router.clone(), "/health").await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(body["browser"]["initialized"], true);
    assert_eq!(body["browser"]["requestCount"], 1);
    assert_eq!(body["browser"]["launches"], 1);
}

#[tokio::test]
async fn version_returns_package_version() {
    let app = create_test_app(FakeBrowser::serving(article_html()), ResponseMode::Async);

    let (status, body) = get(app.router.clone(), "/version").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), env!("CARGO_PKG_VERSION"));
}
