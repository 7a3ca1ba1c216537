// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::any::Any;
use tracing::error;

use crate::utils::errors::CrawlError;

/// 未分类错误对外展示的消息
pub const INTERNAL_ERROR: &str = "Internal server error";

/// 应用错误类型
///
/// 将流水线错误映射为 HTTP 状态码与 `{error}` 响应体
#[derive(Debug)]
pub struct AppError(CrawlError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            CrawlError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CrawlError::ResourceUnavailable(_)
            | CrawlError::NavigationFailed(_)
            | CrawlError::ExtractionFailed(_) => StatusCode::BAD_GATEWAY,
            CrawlError::DeliveryFailed(_) | CrawlError::CleanupFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            INTERNAL_ERROR.to_string()
        } else {
            self.0.to_string()
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<CrawlError> for AppError {
    fn from(err: CrawlError) -> Self {
        Self(err)
    }
}

/// 处理请求过程中发生 panic 时的响应
///
/// 由 `CatchPanicLayer` 调用，细节只写入日志
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    };

    metrics::counter!("http_handler_panics_total").increment(1);
    error!("Request handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": INTERNAL_ERROR })),
    )
        .into_response()
}
