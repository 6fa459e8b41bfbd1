//! Bounded retry with linear backoff.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{Result, WorkdayError};

/// How many times a request is attempted and how long to wait in between.
///
/// The wait after attempt `n` is `backoff_unit * n`, so the defaults give
/// 2s then 4s. No wait follows the final attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// Delay before the attempt following `attempt` (1-based).
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.backoff_unit * attempt
    }

    /// Run `op` until it succeeds, fails with a non-transient error, or the
    /// attempt budget is spent.
    ///
    /// Every failed attempt is logged at warn with the URL and attempt count.
    pub async fn run<T, F, Fut>(&self, url: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => {
                    warn!(url, attempt, max_attempts = attempts, error = %e, "Request attempt failed");
                    last_error = e.to_string();
                    if attempt < attempts {
                        tokio::time::sleep(self.backoff_after(attempt)).await;
                    }
                }
            }
        }

        Err(WorkdayError::RetriesExhausted {
            url: url.to_string(),
            attempts,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn instant() -> RetryPolicy {
        RetryPolicy::new(3).with_backoff_unit(Duration::ZERO)
    }

    fn unavailable() -> WorkdayError {
        WorkdayError::Status {
            status: 503,
            url: "https://example.com".into(),
        }
    }

    #[test]
    fn test_linear_backoff_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_after(1), Duration::from_secs(2));
        assert_eq!(policy.backoff_after(2), Duration::from_secs(4));
        assert_eq!(policy.backoff_after(3), Duration::from_secs(6));
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = Cell::new(0u32);
        let result = instant()
            .run("https://example.com", || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n < 3 {
                        Err(unavailable())
                    } else {
                        Ok("body")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "body");
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_reports_attempts() {
        let calls = Cell::new(0u32);
        let result: Result<()> = instant()
            .run("https://example.com/jobs", || {
                calls.set(calls.get() + 1);
                async { Err(unavailable()) }
            })
            .await;

        assert_eq!(calls.get(), 3);
        match result {
            Err(WorkdayError::RetriesExhausted {
                url,
                attempts,
                last_error,
            }) => {
                assert_eq!(url, "https://example.com/jobs");
                assert_eq!(attempts, 3);
                assert!(last_error.contains("503"));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_transient_error_is_not_retried() {
        let calls = Cell::new(0u32);
        let result: Result<()> = instant()
            .run("https://example.com", || {
                calls.set(calls.get() + 1);
                async { Err(WorkdayError::Config("bad".into())) }
            })
            .await;

        assert_eq!(calls.get(), 1);
        assert!(matches!(result, Err(WorkdayError::Config(_))));
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let calls = Cell::new(0u32);
        let policy = RetryPolicy::new(0).with_backoff_unit(Duration::ZERO);
        let result = policy
            .run("https://example.com", || {
                calls.set(calls.get() + 1);
                async { Ok(1) }
            })
            .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.get(), 1);
    }
}
