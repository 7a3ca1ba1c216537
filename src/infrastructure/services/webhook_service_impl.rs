// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_result::CrawlResult;
use crate::domain::services::webhook_service::WebhookService;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

/// 回调请求的 User-Agent
pub const USER_AGENT: &str = concat!("pagedigest/", env!("CARGO_PKG_VERSION"));

/// Webhook服务实现
///
/// 单次 POST，不重试
pub struct WebhookServiceImpl {
    /// HTTP 客户端
    client: reqwest::Client,
}

impl WebhookServiceImpl {
    /// 创建新的 Webhook 服务实现
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: build_client(timeout, USER_AGENT),
        }
    }
}

fn build_client(timeout: Duration, user_agent: &str) -> reqwest::Client {
    match reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!(
                "Failed to build webhook client, falling back to defaults without timeout or user agent: {}",
                e
            );
            reqwest::Client::new()
        }
    }
}

#[async_trait]
impl WebhookService for WebhookServiceImpl {
    async fn send_webhook(&self, callback_url: &str, result: &CrawlResult) -> Result<()> {
        let response = self
            .client
            .post(callback_url)
            .header("Content-Type", "application/json")
            .json(result)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(anyhow!(
                "Webhook delivery failed with status {}: {}",
                status,
                body
            ))
        }
    }
}
