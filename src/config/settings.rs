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

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含服务器、浏览器、内容提取、页面净化、回调投递等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 内容提取配置
    pub extraction: ExtractionSettings,
    /// 页面净化配置
    pub sanitizer: SanitizerSettings,
    /// 回调投递配置
    pub delivery: DeliverySettings,
    /// 关闭流程配置
    pub shutdown: ShutdownSettings,
    /// 日志配置
    pub logging: LoggingSettings,
    /// 指标配置
    #[serde(default)]
    pub metrics: MetricsSettings,
}

/// 请求处理模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// 校验后立即返回 202，流水线在后台运行
    Async,
    /// 等待流水线完成后返回结果
    Sync,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// 请求处理模式
    pub response_mode: ResponseMode,
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 浏览器最大存活时间（秒），超过后轮换
    pub max_age_secs: u64,
    /// 浏览器最大服务请求数，达到后轮换
    pub max_requests: u64,
    /// 导航超时时间（毫秒）
    pub navigation_timeout_ms: u64,
    /// 页面加载完成后额外等待时间（毫秒）
    pub settle_ms: u64,
    /// 远程 Chrome DevTools 地址
    pub remote_url: Option<String>,
    /// Chrome 可执行文件路径
    pub executable: Option<String>,
    /// 自定义 User-Agent
    pub user_agent: Option<String>,
}

impl BrowserSettings {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// 内容提取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    /// 按顺序启用的提取引擎
    pub engines: Vec<String>,
    /// 每个转换层级的超时时间（毫秒）
    pub conversion_timeout_ms: u64,
    /// 是否在提取前拼接页眉
    pub splice_header: bool,
}

impl ExtractionSettings {
    pub fn conversion_timeout(&self) -> Duration {
        Duration::from_millis(self.conversion_timeout_ms)
    }
}

/// 页面净化配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SanitizerSettings {
    /// 是否拦截广告与追踪请求
    pub block_ads: bool,
    /// 是否处理 Cookie 同意弹窗
    pub handle_cookie_consent: bool,
}

/// 回调投递配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DeliverySettings {
    /// 回调请求超时时间（秒）
    pub timeout_secs: u64,
}

/// 关闭流程配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ShutdownSettings {
    /// 浏览器清理的最长等待时间（毫秒）
    pub grace_ms: u64,
}

impl ShutdownSettings {
    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// 是否输出调试日志
    pub debug: bool,
    /// 是否输出 JSON 格式日志
    pub json: bool,
}

/// 指标配置设置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsSettings {
    /// Prometheus 导出地址，未设置时不启动导出器
    pub listen: Option<String>,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("PAGEDIGEST")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("extraction.engines")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 仅使用内置默认值构建配置，不读取文件与环境变量
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.response_mode", "async")?
            // Rotation thresholds
            .set_default("browser.max_age_secs", 3600)?
            .set_default("browser.max_requests", 100)?
            .set_default("browser.navigation_timeout_ms", 30_000)?
            .set_default("browser.settle_ms", 0)?
            .set_default("extraction.engines", vec!["readability"])?
            .set_default("extraction.conversion_timeout_ms", 5_000)?
            .set_default("extraction.splice_header", true)?
            .set_default("sanitizer.block_ads", true)?
            .set_default("sanitizer.handle_cookie_consent", true)?
            .set_default("delivery.timeout_secs", 10)?
            .set_default("shutdown.grace_ms", 1_000)?
            .set_default("logging.debug", false)?
            .set_default("logging.json", false)
    }
}
