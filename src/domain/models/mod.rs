// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 抓取请求（crawl_request）：一次入站调用携带的目标与投递方式
/// - 提取文章（article）：提取引擎从渲染后 DOM 中得到的正文记录
/// - 抓取结果（crawl_result）：流水线的最终产物，用于回调或日志输出
pub mod article;
pub mod crawl_request;
pub mod crawl_result;
