// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use htmd::options::{CodeBlockStyle, HeadingStyle, Options};
use htmd::HtmlToMarkdown;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// 单个转换层的失败原因
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("converter produced empty output")]
    Empty,
    #[error("converter timed out after {0:?}")]
    Timeout(Duration),
    #[error("converter panicked: {0}")]
    Panicked(String),
    #[error("converter failed: {0}")]
    Failed(String),
}

/// 转换层：名称 + 转换函数 + 超时
#[derive(Clone, Copy)]
pub struct ConversionTier {
    pub name: &'static str,
    pub attempt: fn(&str) -> Result<String, ConversionError>,
    pub timeout: Duration,
}

/// HTML 到 Markdown 的降级转换链
///
/// 按顺序尝试各层，首个非空结果胜出；全部失败时由不会失败的
/// 正则剥离层兜底，因此 `convert` 总是返回字符串。
pub struct MarkdownConverter {
    tiers: Vec<ConversionTier>,
}

impl MarkdownConverter {
    /// 默认转换链：html2md → htmd → 正则剥离
    pub fn new(timeout: Duration) -> Self {
        Self::with_tiers(vec![
            ConversionTier {
                name: "html2md",
                attempt: convert_html2md,
                timeout,
            },
            ConversionTier {
                name: "htmd",
                attempt: convert_htmd,
                timeout,
            },
        ])
    }

    pub fn with_tiers(tiers: Vec<ConversionTier>) -> Self {
        Self { tiers }
    }

    pub async fn convert(&self, html: &str) -> String {
        for tier in &self.tiers {
            match run_tier(tier, html).await {
                Ok(markdown) => {
                    metrics::counter!("markdown_conversions_total", "tier" => tier.name).increment(1);
                    return markdown;
                }
                Err(ConversionError::Empty) => {
                    debug!(tier = tier.name, "Conversion tier produced no text, falling through");
                }
                Err(e) => {
                    warn!(tier = tier.name, "Conversion tier failed: {}", e);
                }
            }
        }

        metrics::counter!("markdown_conversions_total", "tier" => "strip_tags").increment(1);
        strip_tags(html)
    }
}

/// 在阻塞线程池中执行一层转换，并与计时器竞争
///
/// 超时后转换任务不会被取消，只是结果被丢弃
async fn run_tier(tier: &ConversionTier, html: &str) -> Result<String, ConversionError> {
    let input = html.to_owned();
    let attempt = tier.attempt;
    let task = tokio::task::spawn_blocking(move || attempt(&input));

    match tokio::time::timeout(tier.timeout, task).await {
        Err(_) => Err(ConversionError::Timeout(tier.timeout)),
        Ok(Err(join_error)) => Err(ConversionError::Panicked(join_error.to_string())),
        Ok(Ok(result)) => {
            let markdown = result?;
            if markdown.trim().is_empty() {
                Err(ConversionError::Empty)
            } else {
                Ok(markdown)
            }
        }
    }
}

fn convert_html2md(html: &str) -> Result<String, ConversionError> {
    Ok(html2md::parse_html(html))
}

fn convert_htmd(html: &str) -> Result<String, ConversionError> {
    let converter = HtmlToMarkdown::builder()
        .options(Options {
            heading_style: HeadingStyle::Atx,
            code_block_style: CodeBlockStyle::Fenced,
            ..Default::default()
        })
        .build();
    converter
        .convert(html)
        .map_err(|e| ConversionError::Failed(e.to_string()))
}

static INVISIBLE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style|noscript|template)\b[^>]*>.*?</(script|style|noscript|template)>")
        .expect("invisible block regex")
});
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment regex"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// 兜底层：剥离全部标签，解码实体并折叠空白
pub fn strip_tags(html: &str) -> String {
    let text = INVISIBLE_BLOCK.replace_all(html, " ");
    let text = COMMENT.replace_all(&text, " ");
    let text = TAG.replace_all(&text, " ");
    let text = html_escape::decode_html_entities(&text);
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}
