// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::article::ExtractedArticle;
use crate::engines::traits::ExtractionEngine;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// 参与打分的文本块
const BLOCK_SELECTOR: &str = "p, pre, blockquote, li, td, h2, h3, h4";
/// 文本块最少字符数，过短的块不计分
const MIN_BLOCK_CHARS: usize = 25;
/// 候选正文最少字符数
const MIN_ARTICLE_CHARS: usize = 140;
/// 祖先为这些标签的块视为页面框架
const CHROME_TAGS: &[&str] = &["nav", "aside", "footer", "form", "menu", "dialog"];
/// 文本不可见的标签
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

static BOILERPLATE_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(^|[\s_-])(comments?|sidebar|footer|menu|share|social|related|promo|advert|ads|cookie|newsletter|breadcrumbs?)($|[\s_-])",
    )
    .expect("boilerplate regex")
});

/// 文本密度引擎
///
/// 将每个文本块的有效字数（扣除链接文字）累加到父节点和祖父节点，
/// 再按候选节点自身的链接密度折算，得分最高者作为正文容器。
/// 与 Readability 不同，它不改写 DOM，适合作为第二引擎补全内容。
#[derive(Debug, Default, Clone, Copy)]
pub struct DensityEngine;

impl DensityEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ExtractionEngine for DensityEngine {
    fn name(&self) -> &'static str {
        "density"
    }

    fn parse(&self, html: &str, url: &Url) -> Option<ExtractedArticle> {
        let document = Html::parse_document(html);
        let block_selector = Selector::parse(BLOCK_SELECTOR).ok()?;

        let mut scores = HashMap::new();
        let mut order = Vec::new();

        for block in document.select(&block_selector) {
            if is_page_chrome(block) {
                continue;
            }
            let text_len = visible_text(block).chars().count();
            if text_len < MIN_BLOCK_CHARS {
                continue;
            }
            let weight = text_len as f64 * (1.0 - link_density(block));

            let mut ancestor = block.parent();
            for factor in [1.0, 0.5] {
                let Some(node) = ancestor else { break };
                if node.value().is_element() {
                    let score: &mut f64 = scores.entry(node.id()).or_insert_with(|| {
                        order.push(node.id());
                        0.0
                    });
                    *score += weight * factor;
                }
                ancestor = node.parent();
            }
        }

        // 按首次出现顺序遍历，同分时取文档中靠前的节点
        let mut best: Option<(ElementRef, f64)> = None;
        for id in order {
            let Some(candidate) = document.tree.get(id).and_then(ElementRef::wrap) else {
                continue;
            };
            let score = scores.get(&id).copied().unwrap_or_default() * (1.0 - link_density(candidate));
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((candidate, score));
            }
        }

        let Some((container, score)) = best else {
            debug!(url = %url, "Density engine found no text blocks");
            return None;
        };

        let text_content = visible_text(container);
        if text_content.chars().count() < MIN_ARTICLE_CHARS {
            debug!(url = %url, score, "Density candidate too short");
            return None;
        }

        let root = document.root_element();
        Some(ExtractedArticle {
            title: meta_content(&document, "meta[property='og:title']")
                .or_else(|| first_text(&document, "title"))
                .or_else(|| first_text(&document, "h1"))
                .unwrap_or_default(),
            byline: meta_content(&document, "meta[name='author']")
                .or_else(|| first_text(&document, "[rel='author'], .byline, .author"))
                .unwrap_or_default(),
            content: container.html(),
            text_content,
            excerpt: meta_content(&document, "meta[name='description']")
                .or_else(|| meta_content(&document, "meta[property='og:description']")),
            site_name: meta_content(&document, "meta[property='og:site_name']"),
            dir: root.value().attr("dir").map(str::to_string),
            lang: root.value().attr("lang").map(str::to_string),
        })
    }
}

/// 元素本身或任一祖先属于导航、侧栏、评论等页面框架
fn is_page_chrome(element: ElementRef) -> bool {
    std::iter::once(*element)
        .chain(element.ancestors())
        .filter_map(ElementRef::wrap)
        .any(|el| {
            let tag = el.value().name();
            if CHROME_TAGS.contains(&tag) || INVISIBLE_TAGS.contains(&tag) {
                return true;
            }
            if matches!(tag, "html" | "body" | "main" | "article") {
                return false;
            }
            el.value()
                .attr("class")
                .into_iter()
                .chain(el.value().attr("id"))
                .any(|hint| BOILERPLATE_HINT.is_match(hint))
        })
}

/// 可见文本，空白折叠为单个空格
fn visible_text(element: ElementRef) -> String {
    let mut words: Vec<&str> = Vec::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(ElementRef::wrap)
            .is_some_and(|parent| INVISIBLE_TAGS.contains(&parent.value().name()));
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }
    words.join(" ")
}

/// 链接文字占全部文字的比例
fn link_density(element: ElementRef) -> f64 {
    let total = visible_text(element).chars().count();
    if total == 0 {
        return 0.0;
    }
    let Ok(anchor) = Selector::parse("a") else {
        return 0.0;
    };
    let linked: usize = element
        .select(&anchor)
        .map(|a| visible_text(a).chars().count())
        .sum();
    (linked as f64 / total as f64).min(1.0)
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .map(visible_text)
        .find(|text| !text.is_empty())
}
