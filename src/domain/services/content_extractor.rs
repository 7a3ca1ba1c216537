// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::article::ExtractedArticle;
use crate::domain::services::header_splice::{splice_header, HeaderSplice};
use crate::domain::services::markdown_converter::MarkdownConverter;
use crate::engines::traits::ExtractionEngine;
use crate::utils::errors::CrawlError;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// 内容提取结果
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedContent {
    pub title: String,
    pub byline: String,
    pub markdown: String,
    /// 产出元数据的引擎
    pub engine: &'static str,
    pub header: HeaderSplice,
}

/// 内容提取器
///
/// 头部拼接 → 依次运行各提取引擎 → 逐个转换为 Markdown → 按引擎顺序合并
pub struct ContentExtractor {
    engines: Vec<Arc<dyn ExtractionEngine>>,
    converter: MarkdownConverter,
    splice_header: bool,
}

impl ContentExtractor {
    pub fn new(
        engines: Vec<Arc<dyn ExtractionEngine>>,
        converter: MarkdownConverter,
        splice_header: bool,
    ) -> Self {
        Self {
            engines,
            converter,
            splice_header,
        }
    }

    pub async fn extract(&self, html: &str, source_url: &str) -> Result<ExtractedContent, CrawlError> {
        let url = Url::parse(source_url)
            .map_err(|e| CrawlError::ExtractionFailed(format!("invalid source url {}: {}", source_url, e)))?;

        let (document, header) = if self.splice_header {
            let (spliced, header) = splice_header(html);
            (Cow::Owned(spliced), header)
        } else {
            (Cow::Borrowed(html), HeaderSplice::default())
        };
        if header.spliced {
            debug!(url = %url, tag = ?header.tag, "Spliced page header into content region");
        }

        let articles: Vec<(&'static str, ExtractedArticle)> = self
            .engines
            .iter()
            .filter_map(|engine| {
                let article = engine.parse(&document, &url);
                if article.is_none() {
                    debug!(url = %url, engine = engine.name(), "Engine returned no article");
                }
                article.map(|a| (engine.name(), a))
            })
            .collect();

        // 元数据取自第一个成功的引擎
        let Some((engine, first)) = articles.first().map(|(name, article)| (*name, article)) else {
            return Err(CrawlError::ExtractionFailed(format!(
                "no engine produced an article for {}",
                url
            )));
        };

        let mut sections = Vec::with_capacity(articles.len());
        for (_, article) in &articles {
            let markdown = self.converter.convert(&article.content).await;
            let markdown = markdown.trim();
            if !markdown.is_empty() {
                sections.push(markdown.to_string());
            }
        }

        info!(
            url = %url,
            engines = articles.len(),
            engine,
            "Content extracted"
        );

        Ok(ExtractedContent {
            title: first.title.clone(),
            byline: first.byline.clone(),
            markdown: sections.join("\n\n"),
            engine,
            header,
        })
    }
}
