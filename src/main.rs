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

use pagedigest::application::use_cases::crawl_pipeline::{CrawlPipeline, NavigationPolicy};
use pagedigest::browser::chrome::ChromeLauncher;
use pagedigest::browser::manager::{BrowserManager, BrowserManagerConfig};
use pagedigest::browser::sanitizer::DefaultPageSanitizer;
use pagedigest::config::settings::Settings;
use pagedigest::domain::services::content_extractor::ContentExtractor;
use pagedigest::domain::services::markdown_converter::MarkdownConverter;
use pagedigest::engines::build_engines;
use pagedigest::infrastructure::metrics::init_metrics;
use pagedigest::infrastructure::services::webhook_service_impl::WebhookServiceImpl;
use pagedigest::presentation::routes;
use pagedigest::utils::telemetry;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = Arc::new(Settings::new()?);

    // 2. Initialize logging and metrics
    telemetry::init_telemetry(&settings.logging);
    info!("Starting pagedigest {}...", env!("CARGO_PKG_VERSION"));
    init_metrics(settings.metrics.listen.as_deref());

    // 3. Browser lifecycle manager
    let launcher = Arc::new(ChromeLauncher::new(settings.browser.clone()));
    let browser = Arc::new(BrowserManager::new(
        launcher,
        BrowserManagerConfig::from(&settings.browser),
    ));

    // Launch eagerly; a failure here is retried by the first request
    let warm = browser.clone();
    tokio::spawn(async move {
        if let Err(e) = warm.warm_up().await {
            warn!("Initial browser launch failed, will retry on first request: {}", e);
        }
    });

    // 4. Extraction components
    let engines = build_engines(&settings.extraction.engines)?;
    info!(
        engines = ?settings.extraction.engines,
        "Extraction engines configured"
    );
    let extractor = Arc::new(ContentExtractor::new(
        engines,
        MarkdownConverter::new(settings.extraction.conversion_timeout()),
        settings.extraction.splice_header,
    ));
    let sanitizer = Arc::new(DefaultPageSanitizer::new(&settings.sanitizer));
    let webhook = Arc::new(WebhookServiceImpl::new(Duration::from_secs(
        settings.delivery.timeout_secs,
    )));

    let pipeline = Arc::new(CrawlPipeline::new(
        browser.clone(),
        sanitizer,
        extractor,
        webhook,
        NavigationPolicy::from(&settings.browser),
    ));

    // 5. Shutdown on SIGINT/SIGTERM
    let grace = settings.shutdown.grace();
    let shutdown_browser = browser.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, closing browser (grace {:?})", grace);
        if !shutdown_browser.shutdown_within(grace).await {
            warn!("Browser did not close within the grace period");
        }
        info!("Exiting");
        std::process::exit(0);
    });

    // 6. Start HTTP server
    let app = routes::app(pipeline, browser, settings.clone());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(
        "Server listening on {} ({:?} mode)",
        addr, settings.server.response_mode
    );

    axum::serve(listener, app).await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
