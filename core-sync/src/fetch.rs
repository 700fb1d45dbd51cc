//! Retried, cancellable chapter fetch.
//!
//! Every attempt gets its own timeout. A 2xx response returns at once; a 429
//! waits three times the base delay; any other failure (transport error,
//! non-success status, timeout) waits `base × attempt`. No wait follows the
//! last attempt. All waits race the cancellation token.

use std::time::Duration;

use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use core_async::sync::CancellationToken;
use core_async::time::{sleep_or_cancel, timeout};
use tracing::{debug, warn};

/// Per-attempt timeout used by both passes.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(15);

const RATE_LIMIT_MULTIPLIER: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    /// Budget for the first sweep over a book: 3 attempts, 1 s base.
    pub fn main_pass() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }

    /// Budget for the second sweep over failed chapters: 2 attempts, 2 s base.
    pub fn remediation() -> Self {
        Self::new(2, Duration::from_millis(2000))
    }

    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    /// Wait after ordinary failure number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    pub fn rate_limit_delay(&self) -> Duration {
        self.base_delay * RATE_LIMIT_MULTIPLIER
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::main_pass()
    }
}

#[derive(Debug)]
pub enum FetchOutcome {
    /// A 2xx response.
    Response(HttpResponse),
    /// Every attempt failed.
    Exhausted { attempts: u32 },
    /// The token was cancelled. Not counted as a failed attempt.
    Cancelled,
}

/// Issue `request` under `policy` until it succeeds, runs out of attempts or
/// `token` is cancelled.
pub async fn fetch_with_retry(
    http: &dyn HttpClient,
    request: HttpRequest,
    policy: &RetryPolicy,
    token: &CancellationToken,
) -> FetchOutcome {
    let request = request.timeout(policy.attempt_timeout);

    for attempt in 1..=policy.max_attempts {
        if token.is_cancelled() {
            return FetchOutcome::Cancelled;
        }

        let result = core_async::select! {
            biased;
            _ = token.cancelled() => return FetchOutcome::Cancelled,
            result = timeout(policy.attempt_timeout, http.execute(request.clone())) => result,
        };

        let wait = match result {
            Ok(Ok(response)) if response.is_success() => {
                debug!(url = %request.url, attempt, "Fetched");
                return FetchOutcome::Response(response);
            }
            Ok(Ok(response)) if response.is_rate_limited() => {
                warn!(url = %request.url, attempt, "Rate limited");
                policy.rate_limit_delay()
            }
            Ok(Ok(response)) => {
                warn!(url = %request.url, attempt, status = response.status, "Unsuccessful response");
                policy.backoff(attempt)
            }
            Ok(Err(e)) => {
                warn!(url = %request.url, attempt, error = %e, "Request failed");
                policy.backoff(attempt)
            }
            Err(_) => {
                warn!(
                    url = %request.url,
                    attempt,
                    timeout_ms = policy.attempt_timeout.as_millis() as u64,
                    "Request timed out"
                );
                policy.backoff(attempt)
            }
        };

        if attempt == policy.max_attempts {
            break;
        }
        if !sleep_or_cancel(wait, token).await {
            return FetchOutcome::Cancelled;
        }
    }

    FetchOutcome::Exhausted {
        attempts: policy.max_attempts,
    }
}
