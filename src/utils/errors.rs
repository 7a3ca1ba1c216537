// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 抓取流水线错误类型
///
/// 每个变体对应流水线中一个可能失败的阶段
#[derive(Error, Debug)]
pub enum CrawlError {
    /// 请求参数无效（调用方错误）
    #[error("{0}")]
    InvalidInput(String),

    /// 浏览器无法启动或无法创建标签页
    #[error("Browser unavailable: {0}")]
    ResourceUnavailable(String),

    /// 目标页面不可达、超时或网络错误
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// 所有提取引擎都未产出结果
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// 回调投递失败
    #[error("Callback delivery failed: {0}")]
    DeliveryFailed(String),

    /// 资源释放失败
    #[error("Cleanup failed: {0}")]
    CleanupFailed(String),
}

impl CrawlError {
    /// 用于日志与指标的错误类别标签
    pub fn kind(&self) -> &'static str {
        match self {
            CrawlError::InvalidInput(_) => "invalid_input",
            CrawlError::ResourceUnavailable(_) => "resource_unavailable",
            CrawlError::NavigationFailed(_) => "navigation_failed",
            CrawlError::ExtractionFailed(_) => "extraction_failed",
            CrawlError::DeliveryFailed(_) => "delivery_failed",
            CrawlError::CleanupFailed(_) => "cleanup_failed",
        }
    }
}
