// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::browser::manager::BrowserManager;
use crate::browser::sanitizer::PageSanitizer;
use crate::browser::tab_guard::TabGuard;
use crate::browser::traits::{BrowserError, BrowserTab};
use crate::config::settings::BrowserSettings;
use crate::domain::models::crawl_request::CrawlRequest;
use crate::domain::models::crawl_result::CrawlResult;
use crate::domain::services::content_extractor::ContentExtractor;
use crate::domain::services::webhook_service::WebhookService;
use crate::utils::errors::CrawlError;
use futures::FutureExt;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// 流水线状态
///
/// 单个请求内严格按声明顺序推进；任一步失败进入 `Errored`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    Validated,
    TabAcquired,
    Sanitized,
    Navigated,
    Extracted,
    Delivered,
    Errored,
}

impl PipelineState {
    fn advance(&mut self, next: PipelineState, url: &str) {
        debug!(url, from = %self, to = %next, "Pipeline transition");
        *self = next;
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Received => "received",
            PipelineState::Validated => "validated",
            PipelineState::TabAcquired => "tab_acquired",
            PipelineState::Sanitized => "sanitized",
            PipelineState::Navigated => "navigated",
            PipelineState::Extracted => "extracted",
            PipelineState::Delivered => "delivered",
            PipelineState::Errored => "errored",
        };
        f.write_str(name)
    }
}

/// 流水线成功结束时的结果
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// 测试模式：结果已写入日志
    Logged(CrawlResult),
    /// 生产模式：已尝试回调，`callback_ok` 表示回调方是否返回 2xx
    Delivered {
        result: CrawlResult,
        callback_ok: bool,
    },
}

impl PipelineOutcome {
    pub fn result(&self) -> &CrawlResult {
        match self {
            PipelineOutcome::Logged(result) => result,
            PipelineOutcome::Delivered { result, .. } => result,
        }
    }
}

/// 导航相关的时间参数
#[derive(Debug, Clone, Copy)]
pub struct NavigationPolicy {
    /// 导航（含等待页面稳定）的硬超时
    pub timeout: Duration,
    /// load 事件后的额外等待
    pub settle: Duration,
}

impl From<&BrowserSettings> for NavigationPolicy {
    fn from(settings: &BrowserSettings) -> Self {
        Self {
            timeout: settings.navigation_timeout(),
            settle: settings.settle(),
        }
    }
}

/// 单请求抓取流水线
///
/// 获取标签页 → 净化 → 导航 → 提取 → 关闭标签页 → 投递。
/// 无论成败标签页总会在投递前关闭。
/// 浏览器本身由 `BrowserManager` 持有，流水线从不关闭它。
pub struct CrawlPipeline {
    browser: Arc<BrowserManager>,
    sanitizer: Arc<dyn PageSanitizer>,
    extractor: Arc<ContentExtractor>,
    webhook: Arc<dyn WebhookService>,
    navigation: NavigationPolicy,
}

impl CrawlPipeline {
    pub fn new(
        browser: Arc<BrowserManager>,
        sanitizer: Arc<dyn PageSanitizer>,
        extractor: Arc<ContentExtractor>,
        webhook: Arc<dyn WebhookService>,
        navigation: NavigationPolicy,
    ) -> Self {
        Self {
            browser,
            sanitizer,
            extractor,
            webhook,
            navigation,
        }
    }

    /// 在后台运行流水线，调用方不持有任务句柄
    pub fn spawn_detached(self: &Arc<Self>, request: CrawlRequest) {
        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            let url = request.url.clone();
            let run = AssertUnwindSafe(pipeline.run(request)).catch_unwind();
            if run.await.is_err() {
                metrics::counter!("crawl_pipeline_total", "outcome" => "panic").increment(1);
                error!(url = %url, "Crawl pipeline panicked");
            }
        });
    }

    /// 运行完整流水线
    ///
    /// 错误在此处统一记录日志；返回值供同步模式映射为 HTTP 状态
    pub async fn run(&self, request: CrawlRequest) -> Result<PipelineOutcome, CrawlError> {
        let span = info_span!("crawl", request_id = %Uuid::new_v4(), test = request.test);
        self.run_inner(request).instrument(span).await
    }

    async fn run_inner(&self, request: CrawlRequest) -> Result<PipelineOutcome, CrawlError> {
        let started = Instant::now();
        let mut state = PipelineState::Received;
        state.advance(PipelineState::Validated, &request.url);

        let result = self.execute(&request, &mut state).await;

        metrics::histogram!("crawl_pipeline_duration_seconds").record(started.elapsed().as_secs_f64());
        match &result {
            Ok(_) => {
                metrics::counter!("crawl_pipeline_total", "outcome" => "success").increment(1);
                info!(
                    url = %request.url,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Crawl pipeline completed"
                );
            }
            Err(e) => {
                let failed_after = state;
                state.advance(PipelineState::Errored, &request.url);
                metrics::counter!("crawl_pipeline_total", "outcome" => e.kind()).increment(1);
                error!(
                    url = %request.url,
                    %failed_after,
                    kind = e.kind(),
                    timestamp = %chrono::Utc::now().to_rfc3339(),
                    "Crawl pipeline failed: {}",
                    e
                );
            }
        }
        result
    }

    async fn execute(
        &self,
        request: &CrawlRequest,
        state: &mut PipelineState,
    ) -> Result<PipelineOutcome, CrawlError> {
        let tab = self.open_tab().await?;
        state.advance(PipelineState::TabAcquired, &request.url);

        let extracted = self.drive(&*tab, request, state).await;

        // Cleanup: 只关闭标签页，且先于投递完成
        if let Err(e) = tab.release().await {
            let err = CrawlError::CleanupFailed(e.to_string());
            warn!(url = %request.url, "{}", err);
        }

        let outcome = self.deliver(request, extracted?).await;
        state.advance(PipelineState::Delivered, &request.url);
        Ok(outcome)
    }

    async fn open_tab(&self) -> Result<TabGuard, CrawlError> {
        let session = self
            .browser
            .acquire()
            .await
            .map_err(|e| CrawlError::ResourceUnavailable(e.to_string()))?;
        let tab = session
            .new_tab()
            .await
            .map_err(|e| CrawlError::ResourceUnavailable(e.to_string()))?;
        Ok(TabGuard::new(tab))
    }

    async fn drive(
        &self,
        tab: &dyn BrowserTab,
        request: &CrawlRequest,
        state: &mut PipelineState,
    ) -> Result<CrawlResult, CrawlError> {
        self.sanitizer.prepare(tab).await;
        state.advance(PipelineState::Sanitized, &request.url);

        let html = self.navigate(tab, &request.url).await?;
        state.advance(PipelineState::Navigated, &request.url);

        let content = self.extractor.extract(&html, &request.url).await?;
        state.advance(PipelineState::Extracted, &request.url);

        Ok(CrawlResult::new(
            request.url.clone(),
            content.title,
            content.byline,
            content.markdown,
        ))
    }

    async fn navigate(&self, tab: &dyn BrowserTab, url: &str) -> Result<String, CrawlError> {
        let settle = self.navigation.settle;
        let load = async {
            tab.navigate(url).await?;
            if !settle.is_zero() {
                tokio::time::sleep(settle).await;
            }
            Ok::<(), BrowserError>(())
        };

        match tokio::time::timeout(self.navigation.timeout, load).await {
            Err(_) => {
                return Err(CrawlError::NavigationFailed(format!(
                    "timed out after {}ms loading {}",
                    self.navigation.timeout.as_millis(),
                    url
                )))
            }
            Ok(Err(e)) => return Err(CrawlError::NavigationFailed(e.to_string())),
            Ok(Ok(())) => {}
        }

        self.sanitizer.after_navigation(tab).await;

        tab.content()
            .await
            .map_err(|e| CrawlError::NavigationFailed(format!("failed to read rendered page: {}", e)))
    }

    async fn deliver(&self, request: &CrawlRequest, result: CrawlResult) -> PipelineOutcome {
        if request.test {
            info!(
                url = %result.url,
                title = %result.title,
                byline = %result.byline,
                markdown = %result.markdown,
                "Test mode crawl result"
            );
            return PipelineOutcome::Logged(result);
        }

        let Some(callback_url) = request.callback_url.as_deref() else {
            warn!(url = %result.url, "No callback url for production request, result dropped");
            return PipelineOutcome::Delivered {
                result,
                callback_ok: false,
            };
        };

        let callback_ok = match self.webhook.send_webhook(callback_url, &result).await {
            Ok(()) => {
                metrics::counter!("callback_deliveries_total", "outcome" => "success").increment(1);
                info!(url = %result.url, callback_url, "Result delivered to callback");
                true
            }
            Err(e) => {
                metrics::counter!("callback_deliveries_total", "outcome" => "failure").increment(1);
                let err = CrawlError::DeliveryFailed(e.to_string());
                warn!(url = %result.url, callback_url, "{}", err);
                false
            }
        };

        PipelineOutcome::Delivered {
            result,
            callback_ok,
        }
    }
}
