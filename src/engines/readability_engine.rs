// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::article::ExtractedArticle;
use crate::engines::traits::ExtractionEngine;
use dom_smoothie::Readability;
use tracing::debug;
use url::Url;

/// 基于 dom_smoothie 的 Readability 引擎
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadabilityEngine;

impl ReadabilityEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ExtractionEngine for ReadabilityEngine {
    fn name(&self) -> &'static str {
        "readability"
    }

    fn parse(&self, html: &str, url: &Url) -> Option<ExtractedArticle> {
        let mut reader = match Readability::new(html, Some(url.as_str()), None) {
            Ok(reader) => reader,
            Err(e) => {
                debug!(url = %url, "Readability could not load document: {}", e);
                return None;
            }
        };

        let article = match reader.parse() {
            Ok(article) => article,
            Err(e) => {
                debug!(url = %url, "Readability found no article: {}", e);
                return None;
            }
        };

        let extracted = ExtractedArticle {
            title: article.title,
            byline: article.byline.unwrap_or_default(),
            content: article.content.to_string(),
            text_content: article.text_content.to_string(),
            excerpt: article.excerpt,
            site_name: article.site_name,
            dir: article.dir,
            lang: article.lang,
        };

        extracted.has_text().then_some(extracted)
    }
}
