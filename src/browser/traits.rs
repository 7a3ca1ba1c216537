// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// 浏览器错误类型
#[derive(Error, Debug)]
pub enum BrowserError {
    /// 浏览器启动失败
    #[error("Failed to launch browser: {0}")]
    Launch(String),
    /// 标签页创建失败
    #[error("Failed to open tab: {0}")]
    Tab(String),
    /// 导航失败
    #[error("Navigation error: {0}")]
    Navigation(String),
    /// CDP 命令执行失败
    #[error("Browser command failed: {0}")]
    Command(String),
    /// 浏览器已断开连接
    #[error("Browser disconnected")]
    Disconnected,
}

/// 浏览器启动器特质
///
/// 每次调用都产生一个全新的浏览器进程（或远程连接）
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// 启动新的浏览器会话
    async fn launch(&self) -> Result<Arc<dyn BrowserSession>, BrowserError>;
}

/// 浏览器会话特质
///
/// 表示一个长期存活、可被多个请求共享的浏览器进程
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// 创建一个隔离的标签页
    async fn new_tab(&self) -> Result<Box<dyn BrowserTab>, BrowserError>;

    /// 浏览器进程是否仍然连接
    fn is_connected(&self) -> bool;

    /// 关闭浏览器进程
    async fn close(&self) -> Result<(), BrowserError>;
}

/// 标签页特质
///
/// 每个请求独占一个标签页，用完即关闭
#[async_trait]
pub trait BrowserTab: Send + Sync {
    /// 在本标签页范围内拦截匹配的请求 URL
    async fn block_urls(&self, patterns: &[String]) -> Result<(), BrowserError>;

    /// 注册在任何页面脚本之前执行的脚本
    async fn add_init_script(&self, source: &str) -> Result<(), BrowserError>;

    /// 导航到目标地址并等待加载完成
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    /// 在当前页面执行脚本
    async fn evaluate(&self, script: &str) -> Result<(), BrowserError>;

    /// 获取渲染后的 HTML
    async fn content(&self) -> Result<String, BrowserError>;

    /// 关闭标签页（不关闭所属的浏览器）
    async fn close(&self) -> Result<(), BrowserError>;
}
