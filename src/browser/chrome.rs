// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::browser::traits::{BrowserError, BrowserLauncher, BrowserSession, BrowserTab};
use crate::config::settings::BrowserSettings;
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::{EnableParams, SetBlockedUrLsParams};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 基于 chromiumoxide 的浏览器启动器
///
/// 配置了 `remote_url` 时连接已有的 Chrome 实例，否则启动本地无头 Chromium
pub struct ChromeLauncher {
    settings: BrowserSettings,
}

impl ChromeLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    async fn launch(&self) -> Result<Arc<dyn BrowserSession>, BrowserError> {
        let (browser, mut handler) = if let Some(ref url) = self.settings.remote_url {
            info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url)
                .await
                .map_err(|e| BrowserError::Launch(format!("remote Chrome at {}: {}", url, e)))?
        } else {
            let mut builder = BrowserConfig::builder()
                .no_sandbox()
                .request_timeout(self.settings.navigation_timeout())
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage");

            if let Some(ref executable) = self.settings.executable {
                builder = builder.chrome_executable(executable);
            }

            let config = builder.build().map_err(BrowserError::Launch)?;
            Browser::launch(config)
                .await
                .map_err(|e| BrowserError::Launch(e.to_string()))?
        };

        let connected = Arc::new(AtomicBool::new(true));
        let handler_connected = connected.clone();

        // The handler stream ends when the CDP connection drops; that is the
        // only disconnection signal chromiumoxide gives us.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
            handler_connected.store(false, Ordering::SeqCst);
            warn!("Browser event stream closed, marking browser as disconnected");
        });

        Ok(Arc::new(ChromeSession {
            browser: RwLock::new(browser),
            connected,
            handler_task,
            user_agent: self.settings.user_agent.clone(),
        }))
    }
}

/// chromiumoxide 浏览器会话
pub struct ChromeSession {
    browser: RwLock<Browser>,
    connected: Arc<AtomicBool>,
    handler_task: JoinHandle<()>,
    user_agent: Option<String>,
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn new_tab(&self) -> Result<Box<dyn BrowserTab>, BrowserError> {
        if !self.is_connected() {
            return Err(BrowserError::Disconnected);
        }

        let page = self
            .browser
            .read()
            .await
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Tab(e.to_string()))?;

        if let Some(ref user_agent) = self.user_agent {
            page.set_user_agent(user_agent.as_str())
                .await
                .map_err(|e| BrowserError::Tab(e.to_string()))?;
        }

        Ok(Box::new(ChromeTab { page }))
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst) && !self.handler_task.is_finished()
    }

    async fn close(&self) -> Result<(), BrowserError> {
        let mut browser = self.browser.write().await;
        let result = browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::Command(e.to_string()));

        // Reap the child process even when the close command failed.
        if let Err(e) = browser.wait().await {
            debug!("Failed to wait for browser process: {}", e);
        }

        self.handler_task.abort();
        self.connected.store(false, Ordering::SeqCst);
        result
    }
}

/// chromiumoxide 标签页
pub struct ChromeTab {
    page: Page,
}

#[async_trait]
impl BrowserTab for ChromeTab {
    async fn block_urls(&self, patterns: &[String]) -> Result<(), BrowserError> {
        self.page
            .execute(EnableParams::default())
            .await
            .map_err(|e| BrowserError::Command(e.to_string()))?;
        self.page
            .execute(SetBlockedUrLsParams::new(patterns.to_vec()))
            .await
            .map_err(|e| BrowserError::Command(e.to_string()))?;
        Ok(())
    }

    async fn add_init_script(&self, source: &str) -> Result<(), BrowserError> {
        self.page
            .execute(AddScriptToEvaluateOnNewDocumentParams::new(source))
            .await
            .map_err(|e| BrowserError::Command(e.to_string()))?;
        Ok(())
    }

    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        // goto waits for the load event by default
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<(), BrowserError> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::Command(e.to_string()))?;
        Ok(())
    }

    async fn content(&self) -> Result<String, BrowserError> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::Command(e.to_string()))
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| BrowserError::Command(e.to_string()))
    }
}
