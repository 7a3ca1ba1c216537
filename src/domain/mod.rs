// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：请求、文章与抓取结果
/// - 服务（services）：内容提取、Markdown 转换与结果投递
///
/// 领域层不依赖浏览器或 HTTP 实现。
pub mod models;
pub mod services;
