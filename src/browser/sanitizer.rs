// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::browser::traits::BrowserTab;
use crate::config::settings::SanitizerSettings;
use async_trait::async_trait;
use tracing::{debug, warn};

/// 常见广告与追踪域名的 URL 模式（CDP `Network.setBlockedURLs` 通配语法）
const AD_TRACKER_PATTERNS: &[&str] = &[
    "*doubleclick.net*",
    "*googlesyndication.com*",
    "*googleadservices.com*",
    "*google-analytics.com*",
    "*googletagmanager.com*",
    "*googletagservices.com*",
    "*adservice.google.*",
    "*amazon-adsystem.com*",
    "*connect.facebook.net*",
    "*scorecardresearch.com*",
    "*quantserve.com*",
    "*taboola.com*",
    "*outbrain.com*",
    "*criteo.com*",
    "*criteo.net*",
    "*adnxs.com*",
    "*pubmatic.com*",
    "*rubiconproject.com*",
    "*moatads.com*",
    "*chartbeat.com*",
    "*hotjar.com*",
    "*mixpanel.com*",
    "*segment.io*",
    "*cdn.segment.com*",
    "*adsafeprotected.com*",
    "*casalemedia.com*",
];

/// 常见同意管理平台的"拒绝"按钮选择器，按优先级排列
const CONSENT_REJECT_SELECTORS: &[&str] = &[
    "#onetrust-reject-all-handler",
    "#CybotCookiebotDialogBodyButtonDecline",
    "#didomi-notice-disagree-button",
    ".qc-cmp2-summary-buttons button[mode='secondary']",
    "#truste-consent-required",
    "button[data-testid='uc-deny-all-button']",
    ".fc-cta-do-not-consent",
    ".sp_choice_type_REJECT_ALL",
    "button[aria-label*='Reject']",
    "button[aria-label*='reject']",
];

/// 常见同意弹窗容器选择器，拒绝失败时直接移除
const CONSENT_CONTAINER_SELECTORS: &[&str] = &[
    "#onetrust-consent-sdk",
    "#CybotCookiebotDialog",
    "#didomi-host",
    ".qc-cmp2-container",
    "#usercentrics-root",
    ".fc-consent-root",
    "[id^='sp_message_container']",
    "#truste-consent-track",
];

fn selector_list(selectors: &[&str]) -> String {
    selectors
        .iter()
        .map(|s| format!("{:?}", s))
        .collect::<Vec<_>>()
        .join(",")
}

/// 在页面脚本之前注入：DOM 变化时尝试点击拒绝按钮，持续 15 秒
fn consent_init_script() -> String {
    format!(
        r#"(() => {{
  const rejects = [{rejects}];
  const tryReject = () => {{
    for (const sel of rejects) {{
      const el = document.querySelector(sel);
      if (el && typeof el.click === 'function') {{ el.click(); return true; }}
    }}
    return false;
  }};
  const start = () => {{
    if (tryReject()) return;
    const observer = new MutationObserver(() => {{ if (tryReject()) observer.disconnect(); }});
    observer.observe(document.documentElement, {{ childList: true, subtree: true }});
    setTimeout(() => observer.disconnect(), 15000);
  }};
  if (document.readyState === 'loading') {{
    document.addEventListener('DOMContentLoaded', start, {{ once: true }});
  }} else {{
    start();
  }}
}})();"#,
        rejects = selector_list(CONSENT_REJECT_SELECTORS)
    )
}

/// 加载完成后执行：再次点击拒绝按钮并移除残留弹窗
fn consent_opt_out_script() -> String {
    format!(
        r#"(() => {{
  for (const sel of [{rejects}]) {{
    const el = document.querySelector(sel);
    if (el && typeof el.click === 'function') {{ el.click(); break; }}
  }}
  for (const sel of [{containers}]) {{
    document.querySelectorAll(sel).forEach((el) => el.remove());
  }}
  if (document.body) {{ document.body.style.overflow = ''; }}
  return true;
}})()"#,
        rejects = selector_list(CONSENT_REJECT_SELECTORS),
        containers = selector_list(CONSENT_CONTAINER_SELECTORS)
    )
}

/// 页面净化器特质
///
/// 各步骤均为尽力而为：任何失败只记录日志，不影响其他步骤，也不中止导航
#[async_trait]
pub trait PageSanitizer: Send + Sync {
    /// 标签页创建后、导航前调用
    async fn prepare(&self, tab: &dyn BrowserTab);

    /// 导航完成后调用
    async fn after_navigation(&self, tab: &dyn BrowserTab);
}

/// 默认页面净化器：网络层广告拦截 + Cookie 同意处理
pub struct DefaultPageSanitizer {
    block_ads: bool,
    handle_cookie_consent: bool,
    blocklist: Vec<String>,
}

impl DefaultPageSanitizer {
    pub fn new(settings: &SanitizerSettings) -> Self {
        Self {
            block_ads: settings.block_ads,
            handle_cookie_consent: settings.handle_cookie_consent,
            blocklist: AD_TRACKER_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[async_trait]
impl PageSanitizer for DefaultPageSanitizer {
    async fn prepare(&self, tab: &dyn BrowserTab) {
        if self.block_ads {
            match tab.block_urls(&self.blocklist).await {
                Ok(()) => debug!(patterns = self.blocklist.len(), "Ad/tracker filter installed"),
                Err(e) => warn!("Failed to install ad/tracker filter: {}", e),
            }
        }

        if self.handle_cookie_consent {
            if let Err(e) = tab.add_init_script(&consent_init_script()).await {
                warn!("Failed to register cookie consent script: {}", e);
            }
        }
    }

    async fn after_navigation(&self, tab: &dyn BrowserTab) {
        if !self.handle_cookie_consent {
            return;
        }
        if let Err(e) = tab.evaluate(&consent_opt_out_script()).await {
            debug!("Cookie consent opt-out did not run: {}", e);
        }
    }
}
