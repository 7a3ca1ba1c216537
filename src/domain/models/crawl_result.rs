// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 抓取结果
///
/// 流水线的最终产物，构建后不可变；通过回调投递或写入日志，二者只取其一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlResult {
    /// 源 URL
    pub url: String,
    /// 标题
    pub title: String,
    /// 作者署名
    pub byline: String,
    /// 归一化后的 Markdown 正文
    pub markdown: String,
    /// 提取完成时间
    pub extracted_at: DateTime<Utc>,
}

impl CrawlResult {
    pub fn new(url: impl Into<String>, title: String, byline: String, markdown: String) -> Self {
        Self {
            url: url.into(),
            title,
            byline,
            markdown,
            extracted_at: Utc::now(),
        }
    }
}
