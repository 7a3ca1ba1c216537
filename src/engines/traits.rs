// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::article::ExtractedArticle;
use thiserror::Error;
use url::Url;

/// 引擎配置错误
#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    /// 未知的引擎名称
    #[error("Unknown extraction engine: {0}")]
    UnknownEngine(String),
    /// 引擎列表为空
    #[error("At least one extraction engine must be configured")]
    NoEngines,
}

/// 正文提取引擎特质
///
/// 输入为已渲染的完整 HTML，无法识别正文时返回 `None`。
/// 实现必须是纯 CPU 操作，不得访问网络。
pub trait ExtractionEngine: Send + Sync {
    /// 引擎名称，用于配置与日志
    fn name(&self) -> &'static str;

    /// 从 HTML 中提取文章
    fn parse(&self, html: &str, url: &Url) -> Option<ExtractedArticle>;
}
