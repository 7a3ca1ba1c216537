// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_result::CrawlResult;
use anyhow::Result;
use async_trait::async_trait;

/// Webhook服务特质
///
/// 将抓取结果投递到调用方提供的回调地址
#[async_trait]
pub trait WebhookService: Send + Sync {
    /// 发送抓取结果
    ///
    /// # 参数
    ///
    /// * `callback_url` - 回调地址
    /// * `result` - 抓取结果
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 回调方返回 2xx
    /// * `Err(anyhow::Error)` - 网络错误或非 2xx 响应
    async fn send_webhook(&self, callback_url: &str, result: &CrawlResult) -> Result<()>;
}
