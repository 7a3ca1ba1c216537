// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::crawl_pipeline::CrawlPipeline;
use crate::browser::manager::BrowserManager;
use crate::config::settings::Settings;
use crate::presentation::errors::panic_response;
use crate::presentation::handlers::{crawl_handler, health_handler};
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 返回值
///
/// 返回未注入依赖的路由
pub fn routes() -> Router {
    Router::new()
        .route("/crawl", post(crawl_handler::crawl))
        .route("/health", get(health_handler::health_check))
        .route("/version", get(version))
}

/// 创建注入了流水线、浏览器管理器与配置的完整应用
///
/// 处理器中的 panic 被转换为 500 响应，连接不会被直接断开
pub fn app(pipeline: Arc<CrawlPipeline>, browser: Arc<BrowserManager>, settings: Arc<Settings>) -> Router {
    routes()
        .layer(Extension(pipeline))
        .layer(Extension(browser))
        .layer(Extension(settings))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
