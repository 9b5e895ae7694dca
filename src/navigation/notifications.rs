//! Notifications-page navigation — find and open the Nth most-recent post.

use crate::acquisition::driver::PageDriver;
use crate::navigation::strategy::SelectorStrategy;
use crate::pacing;
use anyhow::{bail, Result};
use tracing::{debug, info, warn};

/// Notifications filtered to activity on the viewer's own posts.
pub const NOTIFICATIONS_URL: &str = "https://www.linkedin.com/notifications/?filter=my_posts_all";

/// Fallback selectors for a post notification, tried in order.
const POST_FALLBACKS: &[&str] = &[
    r#"a[href*="/feed/update/"]:first-of-type"#,
    r#"[data-urn*="activity"]:first-child a"#,
    ".notification-item:first-child a",
    ".artdeco-list__item:first-child a",
    "li[data-urn]:first-child a",
];

/// Open the `post_index`-th most recent post (1-based) from the
/// notifications page.
///
/// Tries an indexed selector for explicit indexes, then the strategy's
/// proposal, then the fixed fallback list. A click that lands back on the
/// notifications page is recovered by resolving the post permalink and
/// navigating to it directly. Fails only when nothing clickable was found.
pub async fn open_recent_post(
    driver: &dyn PageDriver,
    strategy: &dyn SelectorStrategy,
    post_index: usize,
    origin: &str,
) -> Result<()> {
    driver.navigate(NOTIFICATIONS_URL, 60_000).await?;
    pacing::sleep_settle_delay().await;

    let mut clicked = false;

    if post_index > 1 {
        let nth = format!(r#"a[href*="/feed/update/"]:nth-of-type({post_index})"#);
        debug!(selector = %nth, "trying indexed post selector");
        clicked = driver.click(&nth).await?;
    }

    if !clicked {
        if let Some(proposed) = strategy.propose(&driver.content().await?).await? {
            debug!(selector = %proposed, "trying proposed selector");
            // A bad proposal must not abort the run.
            clicked = driver.click(&proposed).await.unwrap_or(false);
        }
    }

    if !clicked {
        for selector in POST_FALLBACKS {
            debug!(selector, "trying fallback post selector");
            if driver.click(selector).await? {
                clicked = true;
                break;
            }
        }
    }

    if !clicked {
        bail!("no clickable post found on the notifications page");
    }
    pacing::sleep_settle_delay().await;

    // Some notification clicks expand in place instead of navigating.
    let url = driver.current_url().await?;
    if url.contains("notifications") {
        match driver
            .first_attr(r#"a[href*="/feed/update/"]"#, "href")
            .await?
        {
            Some(href) => {
                let post_url = absolutize(&href, origin);
                info!(url = %post_url, "navigating directly to post");
                driver.navigate(&post_url, 30_000).await?;
                pacing::sleep_settle_delay().await;
            }
            None => warn!("still on notifications page and no post link found"),
        }
    }

    Ok(())
}

/// Resolve a possibly-relative href against the LinkedIn origin.
pub(crate) fn absolutize(href: &str, origin: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    if href.starts_with('/') {
        return format!("{origin}{href}");
    }
    // Rare relative forms go through a real URL join.
    match url::Url::parse(origin).and_then(|base| base.join(href)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => href.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolutize() {
        let origin = "https://www.linkedin.com";
        assert_eq!(
            absolutize("/feed/update/urn:li:activity:123/", origin),
            "https://www.linkedin.com/feed/update/urn:li:activity:123/"
        );
        assert_eq!(
            absolutize("https://www.linkedin.com/feed/update/abc", origin),
            "https://www.linkedin.com/feed/update/abc"
        );
        assert_eq!(
            absolutize("feed/update/abc", origin),
            "https://www.linkedin.com/feed/update/abc"
        );
    }
}
