//! Chromium session management over CDP.
//!
//! `BrowserSession` owns the browser process and its event handler task;
//! `CdpPage` is the `PageDriver` implementation used by the suite. Page
//! state is read through in-page scripts rather than the CDP-side URL
//! cache, because fragment-only navigations are reflected in
//! `window.location.href` immediately while the cached target URL can lag.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{self, EventResponseReceived};
use chromiumoxide::cdp::js_protocol::runtime::{EventConsoleApiCalled, EventExceptionThrown};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::browser::driver::{PageDriver, RawAnchor};
use crate::browser::viewport::{BoundingBox, ViewportSize};
use crate::config::Config;
use crate::error::{NavsmokeError, Result};
use crate::report::LogBundle;

/// Layout/animation settle time before geometry is measured.
const SETTLE_DELAY_MS: u64 = 50;

/// A running Chromium instance.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch a Chromium instance according to the run configuration.
    pub async fn launch(config: &Config) -> Result<Self> {
        let mut builder = BrowserConfig::builder();
        if !config.headless {
            builder = builder.with_head();
        }
        // CI containers routinely run as root where the sandbox cannot start.
        builder = builder.no_sandbox();

        let browser_config = builder.build().map_err(NavsmokeError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| NavsmokeError::Launch(format!("Failed to launch browser: {}", e)))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Open a fresh page with console/network capture wired into `bundle`.
    pub async fn new_page(&self, bundle: &LogBundle) -> Result<CdpPage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| NavsmokeError::Browser(format!("Failed to open page: {}", e)))?;

        let capture_tasks = attach_log_capture(&page, bundle).await;

        Ok(CdpPage {
            page,
            capture_tasks,
        })
    }

    /// Shut the browser down and reap the process.
    pub async fn close(mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .map_err(|e| NavsmokeError::Browser(format!("Failed to close browser: {}", e)))?;
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        Ok(())
    }
}

/// Geometry as measured in-page; `attached: false` means the element was
/// gone by measurement time.
#[derive(Debug, serde::Deserialize)]
struct MeasuredBox {
    attached: bool,
    top: f64,
    bottom: f64,
    left: f64,
    right: f64,
}

impl MeasuredBox {
    fn into_rect(self) -> Option<BoundingBox> {
        self.attached.then_some(BoundingBox {
            top: self.top,
            bottom: self.bottom,
            left: self.left,
            right: self.right,
        })
    }
}

/// One browser page addressed through CDP.
pub struct CdpPage {
    page: Page,
    capture_tasks: Vec<JoinHandle<()>>,
}

impl Drop for CdpPage {
    fn drop(&mut self) {
        for task in &self.capture_tasks {
            task.abort();
        }
    }
}

impl CdpPage {
    async fn eval<T: DeserializeOwned>(&self, script: String, what: &str) -> Result<T> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| NavsmokeError::Browser(format!("{} failed: {}", what, e)))?
            .into_value::<T>()
            .map_err(|e| {
                NavsmokeError::Browser(format!("{} returned an unexpected value: {}", what, e))
            })
    }
}

#[async_trait]
impl PageDriver for CdpPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| NavsmokeError::Browser(format!("Failed to navigate to {}: {}", url, e)))?
            .wait_for_navigation()
            .await
            .map_err(|e| NavsmokeError::Browser(format!("Navigation to {} did not settle: {}", url, e)))?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        self.eval("window.location.href".to_string(), "Reading the URL")
            .await
    }

    async fn anchor_snapshot(&self) -> Result<Vec<RawAnchor>> {
        let script = r#"
            Array.from(document.querySelectorAll('a[href]')).map((a) => {
                const style = window.getComputedStyle(a);
                const visible = a.isConnected
                    && style.display !== 'none'
                    && style.visibility !== 'hidden'
                    && a.getClientRects().length > 0;
                return { href: a.getAttribute('href') || '', visible };
            })
        "#;
        self.eval(script.to_string(), "Anchor snapshot").await
    }

    async fn click_anchor(&self, index: usize) -> Result<()> {
        let script = format!(
            "(() => {{ \
                const a = document.querySelectorAll('a[href]')[{index}]; \
                if (!a) return false; \
                a.click(); \
                return true; \
            }})()"
        );
        let clicked: bool = self.eval(script, "Click").await?;
        if !clicked {
            return Err(NavsmokeError::Browser(format!(
                "Anchor #{} is gone, the DOM changed after collection",
                index
            )));
        }
        Ok(())
    }

    async fn scroll_anchor_into_view(&self, index: usize) -> Result<()> {
        // Scripts always return a concrete value; CDP reports `undefined`
        // as "no value" and the result would not deserialize.
        let script = format!(
            "(() => {{ \
                const a = document.querySelectorAll('a[href]')[{index}]; \
                if (a) a.scrollIntoView({{ block: 'center', inline: 'nearest' }}); \
                return true; \
            }})()"
        );
        let _: bool = self.eval(script, "Scroll to anchor").await?;
        Ok(())
    }

    async fn anchor_box(&self, index: usize) -> Result<Option<BoundingBox>> {
        tokio::time::sleep(Duration::from_millis(SETTLE_DELAY_MS)).await;
        let script = format!(
            "(() => {{ \
                const a = document.querySelectorAll('a[href]')[{index}]; \
                if (!a || !a.isConnected) \
                    return {{ attached: false, top: 0, bottom: 0, left: 0, right: 0 }}; \
                const r = a.getBoundingClientRect(); \
                return {{ attached: true, top: r.top, bottom: r.bottom, left: r.left, right: r.right }}; \
            }})()"
        );
        let measured: MeasuredBox = self.eval(script, "Anchor geometry").await?;
        Ok(measured.into_rect())
    }

    async fn viewport_size(&self) -> Result<ViewportSize> {
        let script = "({ \
            width: window.innerWidth || document.documentElement.clientWidth, \
            height: window.innerHeight || document.documentElement.clientHeight \
        })";
        self.eval(script.to_string(), "Viewport size").await
    }

    async fn count_section_matches(&self, name: &str) -> Result<u64> {
        let script = format!(
            "(() => {{ \
                const name = {needle}; \
                const sel = `[id=\"${{name}}\"], a[name=\"${{name}}\"], \
                    [data-anchor=\"${{name}}\"], [data-menu-anchor=\"${{name}}\"]`; \
                return document.querySelectorAll(sel).length; \
            }})()",
            needle = serde_json::to_string(name)?,
        );
        self.eval(script, "Section lookup").await
    }

    async fn scroll_section_into_view(&self, name: &str) -> Result<()> {
        let script = format!(
            "(() => {{ \
                const name = {needle}; \
                const sel = `[id=\"${{name}}\"], a[name=\"${{name}}\"], \
                    [data-anchor=\"${{name}}\"], [data-menu-anchor=\"${{name}}\"]`; \
                const el = document.querySelector(sel); \
                if (el) el.scrollIntoView({{ block: 'start' }}); \
                return true; \
            }})()",
            needle = serde_json::to_string(name)?,
        );
        let _: bool = self.eval(script, "Scroll to section").await?;
        Ok(())
    }

    async fn main_content_visible(&self) -> Result<bool> {
        let script = "(() => { \
            const el = document.querySelector('main') || document.querySelector('h1'); \
            if (!el) return false; \
            const style = window.getComputedStyle(el); \
            return el.getClientRects().length > 0 \
                && style.display !== 'none' \
                && style.visibility !== 'hidden'; \
        })()";
        self.eval(script.to_string(), "Main content check").await
    }
}

/// Subscribe to console, page-error and network events, feeding `bundle`.
///
/// Capture is instrumentation: any part of it failing to attach is logged
/// and skipped, never surfaced to the caller.
async fn attach_log_capture(page: &Page, bundle: &LogBundle) -> Vec<JoinHandle<()>> {
    let mut tasks = Vec::new();

    if let Err(e) = page.execute(network::EnableParams::default()).await {
        tracing::debug!("network capture unavailable: {}", e);
    }

    match page.event_listener::<EventConsoleApiCalled>().await {
        Ok(mut events) => {
            let sink = bundle.console_handle();
            tasks.push(tokio::spawn(async move {
                while let Some(ev) = events.next().await {
                    let kind = serde_json::to_string(&ev.r#type)
                        .unwrap_or_default()
                        .trim_matches('"')
                        .to_string();
                    let text = ev
                        .args
                        .iter()
                        .map(|arg| {
                            arg.value
                                .as_ref()
                                .map(|v| v.to_string())
                                .or_else(|| arg.description.clone())
                                .unwrap_or_default()
                        })
                        .collect::<Vec<_>>()
                        .join(" ");
                    sink.lock().await.push(format!("{}: {}", kind, text));
                }
            }));
        }
        Err(e) => tracing::debug!("console capture unavailable: {}", e),
    }

    match page.event_listener::<EventExceptionThrown>().await {
        Ok(mut events) => {
            let sink = bundle.console_handle();
            tasks.push(tokio::spawn(async move {
                while let Some(ev) = events.next().await {
                    let detail = ev
                        .exception_details
                        .exception
                        .as_ref()
                        .and_then(|obj| obj.description.clone())
                        .unwrap_or_else(|| ev.exception_details.text.clone());
                    sink.lock().await.push(format!("[Page error]: {}", detail));
                }
            }));
        }
        Err(e) => tracing::debug!("page error capture unavailable: {}", e),
    }

    match page.event_listener::<EventResponseReceived>().await {
        Ok(mut events) => {
            let sink = bundle.network_handle();
            tasks.push(tokio::spawn(async move {
                while let Some(ev) = events.next().await {
                    sink.lock()
                        .await
                        .push(format!("{} {}", ev.response.status, ev.response.url));
                }
            }));
        }
        Err(e) => tracing::debug!("network response capture unavailable: {}", e),
    }

    tasks
}
