//! Sequential best-effort batch writes.
//!
//! Items are written one at a time with a fixed throttle delay between
//! requests. Each item is retried with exponential backoff; an item that
//! still fails is recorded and the batch moves on. Nothing is rolled back,
//! so writers must be idempotent for retries to be safe.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use serde::Serialize;

use crate::types::DbId;

/// Default attempts per item (first try included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(50);

/// Upper bound on a single backoff delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(2);

/// Per-item retry policy with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `retry` (1-based): `base * 2^(retry-1)`, capped.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32
            .checked_shl(retry.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// An item that could not be written after all attempts.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure<T> {
    pub item: T,
    pub error: String,
    pub attempts: u32,
}

/// Result of a batch: IDs written and items that failed.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport<T> {
    pub succeeded: Vec<DbId>,
    pub failed: Vec<BatchFailure<T>>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Write `items` sequentially, sleeping `throttle` between items.
///
/// `write` is called once per attempt. Errors are retried per `policy`;
/// the final error message is kept in the report.
pub async fn run_sequential<T, F, Fut, E>(
    items: Vec<T>,
    throttle: Duration,
    policy: RetryPolicy,
    mut write: F,
) -> BatchReport<T>
where
    F: FnMut(&T) -> Fut,
    Fut: Future<Output = Result<DbId, E>>,
    E: Display,
{
    let mut report = BatchReport::default();
    let max_attempts = policy.max_attempts.max(1);

    for (index, item) in items.into_iter().enumerate() {
        if index > 0 && !throttle.is_zero() {
            tokio::time::sleep(throttle).await;
        }

        let mut attempt = 1;
        loop {
            match write(&item).await {
                Ok(id) => {
                    report.succeeded.push(id);
                    break;
                }
                Err(_) if attempt < max_attempts => {
                    let delay = policy.delay_for(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => {
                    report.failed.push(BatchFailure {
                        item,
                        error: e.to_string(),
                        attempts: attempt,
                    });
                    break;
                }
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn instant_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for(4), Duration::from_millis(500));
        assert_eq!(policy.delay_for(40), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn all_items_succeed() {
        let report = run_sequential(vec![1i32, 2, 3], Duration::ZERO, instant_policy(1), |n| {
            let id = i64::from(*n) * 10;
            async move { Ok::<_, String>(id) }
        })
        .await;

        assert_eq!(report.succeeded, vec![10, 20, 30]);
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn failures_are_counted_without_aborting() {
        let report = run_sequential(vec![1i32, 2, 3, 4], Duration::ZERO, instant_policy(2), |n| {
            let n = *n;
            async move {
                if n % 2 == 0 {
                    Err(format!("write {n} rejected"))
                } else {
                    Ok(i64::from(n))
                }
            }
        })
        .await;

        assert_eq!(report.succeeded, vec![1, 3]);
        assert_eq!(report.failed_count(), 2);
        assert_eq!(report.failed[0].item, 2);
        assert_eq!(report.failed[0].attempts, 2);
        assert_eq!(report.failed[1].error, "write 4 rejected");
    }

    #[tokio::test]
    async fn transient_errors_are_retried() {
        let mut calls: HashMap<i32, u32> = HashMap::new();
        let report = run_sequential(vec![7], Duration::ZERO, instant_policy(3), |n| {
            let count = calls.entry(*n).or_default();
            *count += 1;
            let attempt = *count;
            async move {
                if attempt < 3 {
                    Err("temporarily unavailable")
                } else {
                    Ok(70)
                }
            }
        })
        .await;

        assert_eq!(report.succeeded, vec![70]);
        assert_eq!(calls[&7], 3);
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let report = run_sequential(vec![()], Duration::ZERO, instant_policy(0), |_| async {
            Err::<DbId, _>("nope")
        })
        .await;
        assert_eq!(report.failed[0].attempts, 1);
    }
}
