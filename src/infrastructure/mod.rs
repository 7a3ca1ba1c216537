// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 与外部系统交互的具体实现：
/// - 指标（metrics）：Prometheus 导出器
/// - 服务实现（services）：基于 reqwest 的回调投递
pub mod metrics;
pub mod services;
