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

use crate::browser::traits::{BrowserError, BrowserLauncher, BrowserSession};
use crate::config::settings::BrowserSettings;
use metrics::{counter, gauge};
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// 单次关闭浏览器的最长等待时间，超时后放弃旧实例
const TEARDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// 浏览器轮换配置
#[derive(Debug, Clone)]
pub struct BrowserManagerConfig {
    /// 最大存活时间
    pub max_age: Duration,
    /// 最大服务请求数
    pub max_requests: u64,
}

impl From<&BrowserSettings> for BrowserManagerConfig {
    fn from(settings: &BrowserSettings) -> Self {
        Self {
            max_age: settings.max_age(),
            max_requests: settings.max_requests,
        }
    }
}

/// 浏览器状态快照，用于健康检查
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BrowserStats {
    pub initialized: bool,
    pub requests_served: u64,
    pub age_ms: u64,
    pub max_age_ms: u64,
    pub max_requests: u64,
    pub launches: u64,
}

/// 轮换原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RotationReason {
    Disconnected,
    MaxAge,
    MaxRequests,
}

impl fmt::Display for RotationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationReason::Disconnected => write!(f, "browser disconnected"),
            RotationReason::MaxAge => write!(f, "max age exceeded"),
            RotationReason::MaxRequests => write!(f, "max requests reached"),
        }
    }
}

struct ActiveBrowser {
    session: Arc<dyn BrowserSession>,
    launched_at: Instant,
    requests_served: u64,
}

/// 浏览器资源管理器
///
/// 持有唯一的长期浏览器进程，按存活时间与请求数轮换，并在断连后于下一次
/// `acquire` 时重新启动。`rotation` 锁覆盖"检查-关闭-启动"全过程，保证同一时刻
/// 至多只有一个启动在进行，也就不会出现两个同时存活的浏览器。
pub struct BrowserManager {
    launcher: Arc<dyn BrowserLauncher>,
    config: BrowserManagerConfig,
    rotation: Mutex<()>,
    active: RwLock<Option<ActiveBrowser>>,
    launches: AtomicU64,
    shut_down: AtomicBool,
}

impl BrowserManager {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, config: BrowserManagerConfig) -> Self {
        Self {
            launcher,
            config,
            rotation: Mutex::new(()),
            active: RwLock::new(None),
            launches: AtomicU64::new(0),
            shut_down: AtomicBool::new(false),
        }
    }

    /// 获取当前存活的浏览器
    ///
    /// 必要时先执行轮换；每次调用计为一次服务请求。启动失败直接返回给调用方，
    /// 管理器不做内部重试，下一次调用会自然重试。
    pub async fn acquire(&self) -> Result<Arc<dyn BrowserSession>, BrowserError> {
        self.ensure_browser(true).await
    }

    /// 预热：启动浏览器但不计入请求数
    pub async fn warm_up(&self) -> Result<(), BrowserError> {
        self.ensure_browser(false).await.map(|_| ())
    }

    async fn ensure_browser(&self, count_request: bool) -> Result<Arc<dyn BrowserSession>, BrowserError> {
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(BrowserError::Launch("browser manager is shut down".to_string()));
        }

        let _rotation = self.rotation.lock().await;

        // shutdown() may have run while we waited for the lock
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(BrowserError::Launch("browser manager is shut down".to_string()));
        }

        let rotation = self.active.read().as_ref().and_then(|b| self.rotation_reason(b));
        if let Some(reason) = rotation {
            let previous = self.active.write().take();
            if let Some(previous) = previous {
                info!(
                    reason = %reason,
                    requests_served = previous.requests_served,
                    "Rotating browser instance"
                );
                counter!("browser_rotations_total").increment(1);
                Self::teardown(previous.session).await;
            }
        }

        let needs_launch = self.active.read().is_none();
        if needs_launch {
            let session = self.launcher.launch().await.inspect_err(|e| {
                error!("Browser launch failed: {}", e);
                counter!("browser_launch_failures_total").increment(1);
            })?;
            let launches = self.launches.fetch_add(1, Ordering::SeqCst) + 1;
            counter!("browser_launches_total").increment(1);
            info!(launches, "Browser launched");

            *self.active.write() = Some(ActiveBrowser {
                session,
                launched_at: Instant::now(),
                requests_served: 0,
            });
        }

        let mut active = self.active.write();
        match active.as_mut() {
            Some(current) => {
                if count_request {
                    current.requests_served += 1;
                    gauge!("browser_requests_served").set(current.requests_served as f64);
                }
                Ok(current.session.clone())
            }
            None => Err(BrowserError::Disconnected),
        }
    }

    fn rotation_reason(&self, browser: &ActiveBrowser) -> Option<RotationReason> {
        if !browser.session.is_connected() {
            Some(RotationReason::Disconnected)
        } else if browser.launched_at.elapsed() > self.config.max_age {
            Some(RotationReason::MaxAge)
        } else if browser.requests_served >= self.config.max_requests {
            Some(RotationReason::MaxRequests)
        } else {
            None
        }
    }

    /// 尽力关闭旧实例；失败只记录日志
    async fn teardown(session: Arc<dyn BrowserSession>) {
        match tokio::time::timeout(TEARDOWN_TIMEOUT, session.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to close browser, continuing: {}", e),
            Err(_) => warn!("Timed out closing browser after {:?}, abandoning it", TEARDOWN_TIMEOUT),
        }
    }

    /// 获取只读状态快照
    pub fn stats(&self) -> BrowserStats {
        let active = self.active.read();
        let (initialized, requests_served, age_ms) = match active.as_ref() {
            Some(browser) => (
                browser.session.is_connected(),
                browser.requests_served,
                browser.launched_at.elapsed().as_millis() as u64,
            ),
            None => (false, 0, 0),
        };

        BrowserStats {
            initialized,
            requests_served,
            age_ms,
            max_age_ms: self.config.max_age.as_millis() as u64,
            max_requests: self.config.max_requests,
            launches: self.launches.load(Ordering::SeqCst),
        }
    }

    /// 关闭当前浏览器；可重复调用
    pub async fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
        let _rotation = self.rotation.lock().await;
        let current = self.active.write().take();
        if let Some(current) = current {
            info!("Shutting down browser");
            Self::teardown(current.session).await;
        }
    }

    /// 在截止时间内关闭浏览器，返回是否按时完成
    pub async fn shutdown_within(&self, deadline: Duration) -> bool {
        match tokio::time::timeout(deadline, self.shutdown()).await {
            Ok(()) => true,
            Err(_) => {
                warn!("Browser shutdown exceeded {:?}, giving up", deadline);
                false
            }
        }
    }
}
