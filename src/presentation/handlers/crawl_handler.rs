// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    application::{
        dto::crawl_request::CrawlRequestDto,
        use_cases::crawl_pipeline::{CrawlPipeline, PipelineOutcome},
    },
    config::settings::{ResponseMode, Settings},
    presentation::errors::AppError,
};

/// 受理成功时的响应消息
pub const ACCEPTED_MESSAGE: &str = "Request accepted and processed";

/// 提交抓取请求
///
/// 异步模式校验后立即返回 202；同步模式等待流水线完成
pub async fn crawl(
    Extension(pipeline): Extension<Arc<CrawlPipeline>>,
    Extension(settings): Extension<Arc<Settings>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    // 无法解析的请求体按空对象处理，由校验给出 url 错误
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!("Unreadable crawl request body: {}", rejection);
            Value::Null
        }
    };

    let request = match CrawlRequestDto::from_value(body).validate() {
        Ok(request) => request,
        Err(e) => {
            metrics::counter!("crawl_requests_total", "status" => "rejected").increment(1);
            return Err(e.into());
        }
    };
    metrics::counter!("crawl_requests_total", "status" => "accepted").increment(1);
    info!(url = %request.url, test = request.test, "Crawl request accepted");

    match settings.server.response_mode {
        ResponseMode::Async => {
            pipeline.spawn_detached(request);
            Ok(accepted())
        }
        ResponseMode::Sync => match pipeline.run(request).await? {
            PipelineOutcome::Logged(result) => Ok((
                StatusCode::OK,
                Json(json!({ "message": ACCEPTED_MESSAGE, "result": result })),
            )
                .into_response()),
            PipelineOutcome::Delivered { .. } => Ok(accepted()),
        },
    }
}

fn accepted() -> Response {
    (StatusCode::ACCEPTED, Json(json!({ "message": ACCEPTED_MESSAGE }))).into_response()
}
