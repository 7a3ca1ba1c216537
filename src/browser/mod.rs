// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 浏览器模块
///
/// 管理共享的无头浏览器进程：启动、轮换、断连恢复与关闭，
/// 以及每个请求独占的标签页与页面净化
pub mod chrome;
pub mod manager;
pub mod sanitizer;
pub mod tab_guard;
pub mod traits;
