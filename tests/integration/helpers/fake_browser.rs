// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use pagedigest::browser::traits::{BrowserError, BrowserLauncher, BrowserSession, BrowserTab};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 假页面的导航行为
#[derive(Debug, Clone)]
pub enum FakePage {
    /// 导航成功并返回给定 HTML
    Html(String),
    /// DNS 解析失败
    Unreachable,
    /// 导航永不完成
    Hang,
}

#[derive(Debug, Default)]
pub struct Counters {
    pub launches: AtomicUsize,
    pub tabs_opened: AtomicUsize,
    pub tabs_closed: AtomicUsize,
    pub browsers_closed: AtomicUsize,
}

impl Counters {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// 实现浏览器特质的假后端
pub struct FakeBrowser {
    page: FakePage,
    fail_launch: bool,
    pub counters: Arc<Counters>,
}

impl FakeBrowser {
    pub fn serving(html: String) -> Self {
        Self::with_page(FakePage::Html(html))
    }

    pub fn with_page(page: FakePage) -> Self {
        Self {
            page,
            fail_launch: false,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn failing_launch() -> Self {
        Self {
            page: FakePage::Unreachable,
            fail_launch: true,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn launches(&self) -> usize {
        Counters::get(&self.counters.launches)
    }

    pub fn tabs_opened(&self) -> usize {
        Counters::get(&self.counters.tabs_opened)
    }

    pub fn tabs_closed(&self) -> usize {
        Counters::get(&self.counters.tabs_closed)
    }

    pub fn browsers_closed(&self) -> usize {
        Counters::get(&self.counters.browsers_closed)
    }
}

#[async_trait]
impl BrowserLauncher for FakeBrowser {
    async fn launch(&self) -> Result<Arc<dyn BrowserSession>, BrowserError> {
        if self.fail_launch {
            return Err(BrowserError::Launch("chrome binary not found".to_string()));
        }
        self.counters.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FakeSession {
            page: self.page.clone(),
            counters: self.counters.clone(),
        }))
    }
}

struct FakeSession {
    page: FakePage,
    counters: Arc<Counters>,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn new_tab(&self) -> Result<Box<dyn BrowserTab>, BrowserError> {
        self.counters.tabs_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeTab {
            page: self.page.clone(),
            counters: self.counters.clone(),
        }))
    }

    fn is_connected(&self) -> bool {
        true
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.counters.browsers_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FakeTab {
    page: FakePage,
    counters: Arc<Counters>,
}

#[async_trait]
impl BrowserTab for FakeTab {
    async fn block_urls(&self, _patterns: &[String]) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn add_init_script(&self, _source: &str) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        match self.page {
            FakePage::Html(_) => Ok(()),
            FakePage::Unreachable => Err(BrowserError::Navigation(format!(
                "net::ERR_NAME_NOT_RESOLVED at {}",
                url
            ))),
            FakePage::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }

    async fn evaluate(&self, _script: &str) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn content(&self) -> Result<String, BrowserError> {
        match &self.page {
            FakePage::Html(html) => Ok(html.clone()),
            _ => Err(BrowserError::Command("no document".to_string())),
        }
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.counters.tabs_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
