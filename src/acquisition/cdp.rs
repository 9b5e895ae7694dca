//! CDP-backed `PageDriver` over a remote browser session.
//!
//! Connects to the websocket URL handed out by the session-provisioning API
//! and drives the first (usually only) tab of the remote browser.

use crate::acquisition::driver::PageDriver;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// A live CDP connection to one remote browser tab.
pub struct CdpDriver {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl CdpDriver {
    /// Connect over the CDP websocket and take the session's first tab.
    pub async fn connect(ws_url: &str) -> Result<Self> {
        let (browser, mut handler) = Browser::connect(ws_url)
            .await
            .context("failed to connect to browser websocket")?;

        // The handler stream must be pumped for the connection to make progress.
        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = match browser.pages().await?.into_iter().next() {
            Some(page) => page,
            None => browser.new_page("about:blank").await?,
        };

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }
}

#[async_trait]
impl PageDriver for CdpDriver {
    async fn navigate(&self, url: &str, timeout_ms: u64) -> Result<()> {
        let load = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, anyhow::Error>(())
        };
        timeout(Duration::from_millis(timeout_ms), load)
            .await
            .map_err(|_| anyhow!("navigation to {url} timed out after {timeout_ms}ms"))??;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn content(&self) -> Result<String> {
        self.page.content().await.context("failed to read page HTML")
    }

    async fn click(&self, selector: &str) -> Result<bool> {
        let Ok(element) = self.page.find_element(selector).await else {
            return Ok(false);
        };
        element
            .click()
            .await
            .map(|_| ())
            .with_context(|| format!("click failed for selector {selector}"))?;
        Ok(true)
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<bool> {
        let Ok(element) = self.page.find_element(selector).await else {
            return Ok(false);
        };
        element.click().await.map(|_| ()).ok();
        element
            .type_str(value)
            .await
            .map(|_| ())
            .with_context(|| format!("typing failed for selector {selector}"))?;
        Ok(true)
    }

    async fn first_attr(&self, selector: &str, attr: &str) -> Result<Option<String>> {
        let Ok(element) = self.page.find_element(selector).await else {
            return Ok(None);
        };
        Ok(element.attribute(attr).await.unwrap_or(None))
    }

    async fn scroll_by(&self, y: i64) -> Result<()> {
        self.page
            .evaluate(format!("window.scrollBy(0, {y})"))
            .await
            .context("scroll failed")?;
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let bytes = self
            .page
            .screenshot(params)
            .await
            .context("screenshot capture failed")?;
        std::fs::write(path, bytes)
            .with_context(|| format!("failed to save screenshot to {}", path.display()))?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let Self {
            mut browser,
            page,
            handler_task,
        } = *self;
        drop(page);
        let result = browser.close().await;
        handler_task.abort();
        result.map(|_| ()).context("failed to close browser session")
    }
}
