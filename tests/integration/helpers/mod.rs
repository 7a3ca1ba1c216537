// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod fake_browser;

use axum::Router;
use fake_browser::FakeBrowser;
use pagedigest::application::use_cases::crawl_pipeline::{CrawlPipeline, NavigationPolicy};
use pagedigest::browser::manager::{BrowserManager, BrowserManagerConfig};
use pagedigest::browser::sanitizer::DefaultPageSanitizer;
use pagedigest::config::settings::{ResponseMode, Settings};
use pagedigest::domain::services::content_extractor::ContentExtractor;
use pagedigest::domain::services::markdown_converter::MarkdownConverter;
use pagedigest::engines::build_engines;
use pagedigest::engines::traits::ExtractionEngine;
use pagedigest::infrastructure::services::webhook_service_impl::WebhookServiceImpl;
use pagedigest::presentation::routes;
use parking_lot::Mutex;
use serde_json::Value;
use std::io;
use std::sync::Arc;
use std::time::Duration;

const PARAGRAPH: &str = "The harbour bridge reopened to traffic on Monday after eight months of repairs \
to its steel deck, and engineers said the replacement bearings should last for another half century. ";

/// 可被 Readability 识别的文章页面
pub fn article_html() -> String {
    format!(
        "<html lang=\"en\"><head><title>Harbour bridge reopens</title></head><body>\
         <nav><a href=\"/\">Home</a> <a href=\"/news\">News</a></nav>\
         <article><h1>Harbour bridge reopens</h1>\
         <p>{p}</p><p>{p}</p><p>{p}</p><p>{p}</p></article>\
         <footer>Example News</footer></body></html>",
        p = PARAGRAPH.repeat(2)
    )
}

/// 没有正文的页面
pub fn empty_html() -> String {
    "<html><head><title></title></head><body></body></html>".to_string()
}

/// 测试用配置：短超时，关闭真实浏览器相关选项
pub fn test_settings(mode: ResponseMode) -> Settings {
    let mut settings = Settings::defaults().unwrap();
    settings.server.response_mode = mode;
    settings.browser.navigation_timeout_ms = 300;
    settings.delivery.timeout_secs = 5;
    settings
}

pub struct TestApp {
    pub router: Router,
    pub pipeline: Arc<CrawlPipeline>,
    pub browser: Arc<BrowserManager>,
    pub fake: Arc<FakeBrowser>,
}

pub fn create_test_app(fake: FakeBrowser, mode: ResponseMode) -> TestApp {
    let engines = build_engines(&test_settings(mode).extraction.engines).unwrap();
    create_test_app_with_engines(fake, mode, engines)
}

pub fn create_test_app_with_engines(
    fake: FakeBrowser,
    mode: ResponseMode,
    engines: Vec<Arc<dyn ExtractionEngine>>,
) -> TestApp {
    let settings = Arc::new(test_settings(mode));
    let fake = Arc::new(fake);

    let browser = Arc::new(BrowserManager::new(
        fake.clone(),
        BrowserManagerConfig::from(&settings.browser),
    ));
    let extractor = Arc::new(ContentExtractor::new(
        engines,
        MarkdownConverter::new(settings.extraction.conversion_timeout()),
        settings.extraction.splice_header,
    ));
    let pipeline = Arc::new(CrawlPipeline::new(
        browser.clone(),
        Arc::new(DefaultPageSanitizer::new(&settings.sanitizer)),
        extractor,
        Arc::new(WebhookServiceImpl::new(Duration::from_secs(
            settings.delivery.timeout_secs,
        ))),
        NavigationPolicy::from(&settings.browser),
    ));

    let router = routes::app(pipeline.clone(), browser.clone(), settings);

    TestApp {
        router,
        pipeline,
        browser,
        fake,
    }
}

/// 轮询直到条件成立或超时
pub async fn wait_until(mut condition: impl FnMut() -> bool, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

/// 收集 JSON 格式日志的写入器
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// 安装为当前线程的默认订阅者，守卫释放前一直有效
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::INFO)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// 已记录的事件，每行一条
    pub fn events(&self) -> Vec<Value> {
        let buffer = self.buffer.lock();
        String::from_utf8_lossy(&buffer)
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
