//! Time-related abstractions.
//!
//! Re-exports Tokio's timer primitives and adds [`sleep_or_cancel`], the wait
//! used between retries so that cancellation is observed mid-wait instead of
//! after the full delay.
//!
//! ```rust
//! use core_async::time::{sleep, Duration, Instant};
//!
//! # async fn example() {
//! let start = Instant::now();
//! sleep(Duration::from_millis(10)).await;
//! assert!(start.elapsed() >= Duration::from_millis(10));
//! # }
//! ```

pub use std::time::{Duration, SystemTime, UNIX_EPOCH};
pub use tokio::time::{error::Elapsed, interval, sleep, timeout, Instant, Interval, Sleep};

use crate::sync::CancellationToken;

/// Sleeps for `duration` unless `token` is cancelled first.
///
/// Returns `true` when the full duration elapsed and `false` when the wait was
/// abandoned because of cancellation. An already-cancelled token returns
/// `false` immediately.
pub async fn sleep_or_cancel(duration: Duration, token: &CancellationToken) -> bool {
    if token.is_cancelled() {
        return false;
    }

    tokio::select! {
        biased;
        _ = token.cancelled() => false,
        _ = sleep(duration) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_sleep_or_cancel_completes() {
        let token = CancellationToken::new();
        let start = Instant::now();

        assert!(sleep_or_cancel(Duration::from_millis(300), &token).await);
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_or_cancel_interrupted() {
        let token = CancellationToken::new();
        let trigger = token.clone();

        tokio::spawn(async move {
            sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let start = Instant::now();
        assert!(!sleep_or_cancel(Duration::from_secs(10), &token).await);
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_sleep_or_cancel_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel();

        assert!(!sleep_or_cancel(Duration::from_secs(60), &token).await);
    }
}
