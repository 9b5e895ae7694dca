//! Bounded predicate polling.
//!
//! The one polling construct in the crate: check a predicate on a fixed
//! interval until it holds or a deadline passes. Used for slow out-of-band
//! state changes such as a user completing device verification.

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Poll `predicate` every `interval` until it returns `true` or `timeout`
/// elapses. Returns whether the predicate was satisfied in time.
///
/// The predicate is always evaluated at least once, immediately.
pub async fn poll_until<F, Fut>(mut predicate: F, interval: Duration, timeout: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if predicate().await {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        sleep(interval.min(deadline - now)).await;
    }
}
