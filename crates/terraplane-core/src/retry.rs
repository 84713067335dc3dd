//! Generic retry with exponential backoff and jitter.
//!
//! Used by the lock manager for conditional-write contention, and reusable
//! for any operation whose failures are worth retrying.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

/// Backoff parameters for a retryable operation.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,

    /// Delay before the first retry.
    pub base_delay: Duration,

    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is exhausted.
///
/// Delays double from `base_delay` up to `max_delay`; each sleep gets
/// random jitter so contending callers do not wake in lockstep. The last
/// error is returned unchanged.
pub async fn retry_with_backoff<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    mut is_retryable: P,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: FnMut(&E) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut delay = policy.base_delay;

    for attempt in 1..max_attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if is_retryable(&e) => {
                let jittered = jitter(delay);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = jittered.as_millis() as u64,
                    "Operation failed, retrying"
                );
                tokio::time::sleep(jittered).await;
                delay = std::cmp::min(delay * 2, policy.max_delay);
            }
            Err(e) => return Err(e),
        }
    }

    op().await
}

/// Random delay in `[delay / 2, delay]`.
fn jitter(delay: Duration) -> Duration {
    let millis = delay.as_millis() as u64;
    if millis < 2 {
        return delay;
    }
    Duration::from_millis(rand::thread_rng().gen_range(millis / 2..=millis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let attempts = AtomicU32::new(0);

        let result: Result<u32, &str> = retry_with_backoff(
            &fast_policy(5),
            |_| true,
            || {
                let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 3 {
                        Err("transient")
                    } else {
                        Ok(n)
                    }
                }
            },
        )
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let attempts = AtomicU32::new(0);

        let result: Result<(), &str> = retry_with_backoff(
            &fast_policy(3),
            |_| true,
            || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err("still failing") }
            },
        )
        .await;

        assert_eq!(result.unwrap_err(), "still failing");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_does_not_retry_fatal_errors() {
        let attempts = AtomicU32::new(0);

        let result: Result<(), &str> = retry_with_backoff(
            &fast_policy(5),
            |e| *e != "fatal",
            || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err("fatal") }
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_single_attempt_policy() {
        let attempts = AtomicU32::new(0);

        let result: Result<(), &str> = retry_with_backoff(
            &fast_policy(1),
            |_| true,
            || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err("no luck") }
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
