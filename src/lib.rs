// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 请求校验与抓取流水线编排
pub mod application;

/// 浏览器模块
///
/// 共享浏览器的生命周期管理、标签页守卫与页面净化
pub mod browser;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 核心模型与内容提取服务
pub mod domain;

/// 引擎模块
///
/// 正文提取引擎
pub mod engines;

/// 基础设施模块
///
/// 指标导出与回调投递
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由与处理器
pub mod presentation;

/// 工具模块
///
/// 错误类型与日志初始化
pub mod utils;
