// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, Json};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{browser::manager::BrowserManager, config::settings::Settings};

const MS_PER_MINUTE: u64 = 60_000;

/// 健康检查端点
///
/// 返回浏览器状态快照与生效配置
pub async fn health_check(
    Extension(browser): Extension<Arc<BrowserManager>>,
    Extension(settings): Extension<Arc<Settings>>,
) -> Json<Value> {
    let stats = browser.stats();

    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "browser": {
            "initialized": stats.initialized,
            "requestCount": stats.requests_served,
            "ageMinutes": stats.age_ms / MS_PER_MINUTE,
            "maxRequests": stats.max_requests,
            "maxAgeMinutes": stats.max_age_ms / MS_PER_MINUTE,
            "launches": stats.launches,
        },
        "config": {
            "port": settings.server.port,
            "responseMode": settings.server.response_mode,
            "navigationTimeoutMs": settings.browser.navigation_timeout_ms,
            "conversionTimeoutMs": settings.extraction.conversion_timeout_ms,
            "engines": settings.extraction.engines,
            "spliceHeader": settings.extraction.splice_header,
            "blockAds": settings.sanitizer.block_ads,
            "handleCookieConsent": settings.sanitizer.handle_cookie_consent,
            "debug": settings.logging.debug,
        },
    }))
}
