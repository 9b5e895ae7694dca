//! The `PageDriver` trait — the seam between the pipeline and the browser.
//!
//! Everything above this trait is testable without a browser. Selector-based
//! operations are best-effort: a selector miss is `Ok(false)` / `Ok(None)`,
//! not an error; only transport-level failures surface as `Err`.

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Minimal surface the pipeline needs from a rendered browser tab.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate and wait for the load to settle, bounded by `timeout_ms`.
    async fn navigate(&self, url: &str, timeout_ms: u64) -> Result<()>;

    /// The tab's current URL.
    async fn current_url(&self) -> Result<String>;

    /// Full HTML of the current document.
    async fn content(&self) -> Result<String>;

    /// Click the first element matching `selector`; `false` on a miss.
    async fn click(&self, selector: &str) -> Result<bool>;

    /// Focus the first element matching `selector` and type `value` into it;
    /// `false` on a miss.
    async fn fill(&self, selector: &str, value: &str) -> Result<bool>;

    /// Read `attr` off the first element matching `selector`.
    async fn first_attr(&self, selector: &str, attr: &str) -> Result<Option<String>>;

    /// Scroll the viewport vertically by `y` pixels.
    async fn scroll_by(&self, y: i64) -> Result<()>;

    /// Capture a screenshot of the current viewport to `path`.
    async fn screenshot(&self, path: &Path) -> Result<()>;

    /// Close the tab and release the underlying browser connection.
    async fn close(self: Box<Self>) -> Result<()>;
}
