//! Reaction-modal expansion and capture.

use crate::acquisition::driver::PageDriver;
use crate::pacing;
use anyhow::Result;
use tracing::{debug, warn};

/// Fallback selectors for the "and N others" reaction control, in order.
const REACTION_FALLBACKS: &[&str] = &[
    r#"button[aria-label*="See who reacted"]"#,
    r#"button[aria-label*="reactions"]"#,
    ".feed-shared-social-action-bar__reactions",
    ".feed-shared-social-counts-bar button",
    ".social-actions-bar button:first-child",
];

/// Expand the reaction list on the current post and return the rendered
/// modal HTML, or `None` when no expansion control matched.
///
/// `None` is a degraded outcome, not an error: the post may simply have no
/// reactions, or the markup may have drifted past every fallback.
pub async fn expand_reactions(driver: &dyn PageDriver) -> Result<Option<String>> {
    // Bring the social action bar into view first.
    driver.scroll_by(400).await?;
    pacing::sleep_action_delay().await;

    for selector in REACTION_FALLBACKS {
        debug!(selector, "trying reaction control");
        if driver.click(selector).await? {
            pacing::sleep_settle_delay().await;
            return Ok(Some(driver.content().await?));
        }
    }

    warn!("no reaction expansion control matched");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    /// Driver whose `click` succeeds only for one selector.
    struct OneClickDriver {
        accepts: &'static str,
        clicks: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PageDriver for OneClickDriver {
        async fn navigate(&self, _url: &str, _timeout_ms: u64) -> anyhow::Result<()> {
            Ok(())
        }

        async fn current_url(&self) -> anyhow::Result<String> {
            Ok("https://www.linkedin.com/feed/update/abc".to_string())
        }

        async fn content(&self) -> anyhow::Result<String> {
            Ok("<div class=\"artdeco-list__item\">modal</div>".to_string())
        }

        async fn click(&self, selector: &str) -> anyhow::Result<bool> {
            self.clicks.lock().unwrap().push(selector.to_string());
            Ok(selector == self.accepts)
        }

        async fn fill(&self, _selector: &str, _value: &str) -> anyhow::Result<bool> {
            Ok(false)
        }

        async fn first_attr(
            &self,
            _selector: &str,
            _attr: &str,
        ) -> anyhow::Result<Option<String>> {
            Ok(None)
        }

        async fn scroll_by(&self, _y: i64) -> anyhow::Result<()> {
            Ok(())
        }

        async fn screenshot(&self, _path: &Path) -> anyhow::Result<()> {
            Ok(())
        }

        async fn close(self: Box<Self>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallbacks_stop_at_first_match() {
        let driver = OneClickDriver {
            accepts: ".feed-shared-social-action-bar__reactions",
            clicks: Mutex::new(Vec::new()),
        };

        let modal = expand_reactions(&driver).await.unwrap();
        assert!(modal.unwrap().contains("modal"));

        let clicks = driver.clicks.lock().unwrap();
        assert_eq!(clicks.len(), 3);
        assert_eq!(clicks[2], ".feed-shared-social-action-bar__reactions");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_control_yields_none() {
        let driver = OneClickDriver {
            accepts: "never",
            clicks: Mutex::new(Vec::new()),
        };

        let modal = expand_reactions(&driver).await.unwrap();
        assert!(modal.is_none());
        assert_eq!(driver.clicks.lock().unwrap().len(), REACTION_FALLBACKS.len());
    }
}
