// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::fake_browser::{FakeBrowser, FakePage};
use super::helpers::{article_html, create_test_app, create_test_app_with_engines, wait_until};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pagedigest::config::settings::ResponseMode;
use pagedigest::domain::models::article::ExtractedArticle;
use pagedigest::engines::traits::ExtractionEngine;
use pagedigest::presentation::errors::INTERNAL_ERROR;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use tower::util::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn post_crawl(router: Router, body: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .uri("/crawl")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

struct BrokenEngine;

impl ExtractionEngine for BrokenEngine {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn parse(&self, _html: &str, _url: &Url) -> Option<ExtractedArticle> {
        panic!("engine bug")
    }
}

#[tokio::test]
async fn test_missing_url_is_rejected_without_touching_browser() {
    let app = create_test_app(FakeBrowser::serving(article_html()), ResponseMode::Async);

    let (status, body) = post_crawl(app.router.clone(), r#"{"test": true}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "url is required and must be a string" }));
    assert_eq!(app.fake.launches(), 0);
    assert_eq!(app.fake.tabs_opened(), 0);
}

#[tokio::test]
async fn test_non_string_url_is_rejected() {
    let app = create_test_app(FakeBrowser::serving(article_html()), ResponseMode::Async);

    let (status, body) = post_crawl(app.router.clone(), r#"{"url": 42, "test": true}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "url is required and must be a string");
}

#[tokio::test]
async fn test_missing_callback_is_rejected() {
    let app = create_test_app(FakeBrowser::serving(article_html()), ResponseMode::Async);

    let (status, body) = post_crawl(app.router.clone(), r#"{"url": "https://example.com"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "callback_url is required when test is false" }));
    assert_eq!(app.fake.tabs_opened(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_treated_as_missing_url() {
    let app = create_test_app(FakeBrowser::serving(article_html()), ResponseMode::Async);

    let (status, body) = post_crawl(app.router.clone(), "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "url is required and must be a string");
}

#[tokio::test]
async fn test_async_mode_accepts_and_runs_in_background() {
    let app = create_test_app(FakeBrowser::serving(article_html()), ResponseMode::Async);

    let (status, body) = post_crawl(
        app.router.clone(),
        r#"{"url": "https://example.com", "test": true}"#,
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, json!({ "message": "Request accepted and processed" }));

    let fake = app.fake.clone();
    assert!(wait_until(move || fake.tabs_closed() == 1, Duration::from_secs(5)).await);
}

#[tokio::test]
async fn test_async_mode_accepts_even_when_navigation_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = create_test_app(
        FakeBrowser::with_page(FakePage::Unreachable),
        ResponseMode::Async,
    );
    let body = json!({ "url": "not-a-real-host", "callback_url": server.uri() }).to_string();

    let (status, _) = post_crawl(app.router.clone(), &body).await;

    assert_eq!(status, StatusCode::ACCEPTED);
    let fake = app.fake.clone();
    assert!(wait_until(move || fake.tabs_closed() == 1, Duration::from_secs(5)).await);
}

#[tokio::test]
async fn test_sync_mode_returns_result_in_test_mode() {
    let app = create_test_app(FakeBrowser::serving(article_html()), ResponseMode::Sync);

    let (status, body) = post_crawl(
        app.router.clone(),
        r#"{"url": "https://example.com/bridge", "test": true}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["url"], "https://example.com/bridge");
    assert!(body["result"]["markdown"]
        .as_str()
        .unwrap()
        .contains("replacement bearings"));
}

#[tokio::test]
async fn test_sync_mode_production_success_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_test_app(FakeBrowser::serving(article_html()), ResponseMode::Sync);
    let body = json!({ "url": "https://example.com/bridge", "callback_url": server.uri() }).to_string();

    let (status, body) = post_crawl(app.router.clone(), &body).await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["message"], "Request accepted and processed");
}

#[tokio::test]
async fn test_sync_mode_navigation_failure_is_bad_gateway() {
    let app = create_test_app(
        FakeBrowser::with_page(FakePage::Unreachable),
        ResponseMode::Sync,
    );

    let (status, body) = post_crawl(
        app.router.clone(),
        r#"{"url": "not-a-real-host", "test": true}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().starts_with("Navigation failed"));
}

#[tokio::test]
async fn test_sync_mode_engine_panic_is_internal_error() {
    let app = create_test_app_with_engines(
        FakeBrowser::serving(article_html()),
        ResponseMode::Sync,
        vec![Arc::new(BrokenEngine)],
    );

    let (status, body) = post_crawl(
        app.router.clone(),
        r#"{"url": "https://example.com/bridge", "test": true}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": INTERNAL_ERROR }));

    let fake = app.fake.clone();
    assert!(wait_until(move || fake.tabs_closed() == 1, Duration::from_secs(5)).await);
}
