// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 抓取请求
///
/// 每次入站调用创建一次，校验通过后不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    /// 目标 URL
    pub url: String,
    /// 回调地址，测试模式下可为空
    pub callback_url: Option<String>,
    /// 测试模式：结果写入日志而不是回调
    pub test: bool,
}

impl CrawlRequest {
    /// 测试模式请求
    pub fn test(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            callback_url: None,
            test: true,
        }
    }

    /// 带回调地址的请求
    pub fn with_callback(url: impl Into<String>, callback_url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            callback_url: Some(callback_url.into()),
            test: false,
        }
    }
}
