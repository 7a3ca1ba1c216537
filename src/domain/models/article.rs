// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 提取文章
///
/// 无论由哪个提取引擎产生，都归一化为该结构
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedArticle {
    /// 标题
    pub title: String,
    /// 作者署名
    pub byline: String,
    /// 正文 HTML
    pub content: String,
    /// 正文纯文本
    pub text_content: String,
    /// 摘要
    pub excerpt: Option<String>,
    /// 站点名称
    pub site_name: Option<String>,
    /// 文字方向
    pub dir: Option<String>,
    /// 语言
    pub lang: Option<String>,
}

impl ExtractedArticle {
    /// 正文是否包含可见文本
    pub fn has_text(&self) -> bool {
        !self.text_content.trim().is_empty()
    }
}
