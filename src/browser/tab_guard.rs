// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::browser::traits::{BrowserError, BrowserTab};
use std::ops::Deref;
use std::sync::Arc;
use tracing::warn;

/// 标签页作用域守卫
///
/// 正常路径通过 `release` 显式关闭；若持有者在释放前被丢弃（超时取消、panic），
/// `Drop` 会在后台关闭标签页。守卫只关闭标签页，从不关闭所属的浏览器。
pub struct TabGuard {
    tab: Arc<dyn BrowserTab>,
    released: bool,
}

impl TabGuard {
    pub fn new(tab: Box<dyn BrowserTab>) -> Self {
        Self {
            tab: Arc::from(tab),
            released: false,
        }
    }

    /// 关闭标签页
    pub async fn release(mut self) -> Result<(), BrowserError> {
        self.released = true;
        self.tab.close().await
    }
}

impl Deref for TabGuard {
    type Target = dyn BrowserTab;

    fn deref(&self) -> &Self::Target {
        self.tab.as_ref()
    }
}

impl Drop for TabGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let tab = self.tab.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = tab.close().await {
                        warn!("Failed to close abandoned tab: {}", e);
                    }
                });
            }
            Err(_) => warn!("Tab dropped outside of a runtime, leaving it open"),
        }
    }
}
