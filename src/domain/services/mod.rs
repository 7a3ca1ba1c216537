// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 内容提取（content_extractor）：运行提取引擎并合并 Markdown 输出
/// - 头部拼接（header_splice）：提取前把文章头部移入正文区域
/// - Markdown 转换（markdown_converter）：多层降级的 HTML 转换链
/// - Webhook（webhook_service）：结果投递接口
pub mod content_extractor;
pub mod header_splice;
pub mod markdown_converter;
pub mod webhook_service;
