//! Randomized pacing between UI actions.
//!
//! LinkedIn renders asynchronously after clicks and navigations; every UI
//! step waits a jittered interval rather than a fixed one.

use rand::Rng;
use std::time::Duration;

/// A random delay between `min_ms` and `max_ms` inclusive.
pub fn random_delay(min_ms: u64, max_ms: u64) -> Duration {
    let mut rng = rand::thread_rng();
    Duration::from_millis(rng.gen_range(min_ms..=max_ms))
}

/// Delay between consecutive UI actions (clicks, fills).
pub fn action_delay() -> Duration {
    random_delay(800, 2_500)
}

/// Delay after a navigation, while the page settles.
pub fn settle_delay() -> Duration {
    random_delay(2_000, 5_000)
}

/// Sleep for a random action delay.
pub async fn sleep_action_delay() {
    tokio::time::sleep(action_delay()).await;
}

/// Sleep for a random settle delay.
pub async fn sleep_settle_delay() {
    tokio::time::sleep(settle_delay()).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_stay_in_bounds() {
        for _ in 0..100 {
            let d = random_delay(50, 100);
            assert!(d >= Duration::from_millis(50));
            assert!(d <= Duration::from_millis(100));

            assert!(action_delay() <= Duration::from_millis(2_500));
            assert!(settle_delay() >= Duration::from_millis(2_000));
        }
    }
}
