// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dom_query::{Document, NodeRef};
use serde::Serialize;

/// 文章头部选择器，按优先级排列，首个匹配生效
const HEADER_SELECTORS: &[&str] = &[
    "header.entry-header",
    "header.article-header",
    "header.post-header",
    ".article__header",
    ".article-header",
    ".post-header",
    ".entry-header",
    ".story-header",
    "[class*='ArticleHeader']",
    "[data-testid='article-header']",
];

/// 正文区域选择器，按优先级排列
const CONTENT_SELECTORS: &[&str] = &["article", "main", "[role='main']", "body"];

/// 头部拼接结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderSplice {
    /// 是否发生了拼接
    pub spliced: bool,
    /// 被移动的头部元素标签名
    pub tag: Option<String>,
}

/// 将正文区域之外的文章头部移动到正文区域开头
///
/// 启发式提取器通常会丢弃位于 `<article>` 之外的标题与署名，
/// 提前拼接可以保留这部分内容。未找到头部时原样返回输入。
pub fn splice_header(html: &str) -> (String, HeaderSplice) {
    let unchanged = || (html.to_string(), HeaderSplice::default());

    let document = Document::from(html);
    let Some(target) = CONTENT_SELECTORS
        .iter()
        .filter_map(|selector| document.try_select(selector))
        .find_map(|selection| selection.nodes().first().cloned())
    else {
        return unchanged();
    };

    for selector in HEADER_SELECTORS {
        let Some(matches) = document.try_select(selector) else {
            continue;
        };
        let Some(header) = matches
            .nodes()
            .iter()
            .find(|node| !is_related(node, &target))
            .cloned()
        else {
            continue;
        };

        let tag = header.node_name().map(|name| name.to_string());
        let header_html = header.html();
        header.remove_from_parent();
        target.prepend_html(header_html);

        return (
            document.html().to_string(),
            HeaderSplice { spliced: true, tag },
        );
    }

    unchanged()
}

/// 两个节点相同，或互为祖先
fn is_related(a: &NodeRef, b: &NodeRef) -> bool {
    a.id == b.id
        || a.ancestors(None).iter().any(|n| n.id == b.id)
        || b.ancestors(None).iter().any(|n| n.id == a.id)
}
