//! Exponential-backoff retry envelope for single upstream calls.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use storyboard_error::RetryableError;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, warn};

/// How many times, and how patiently, a call is retried.
///
/// The delay before retry `k` (0-based) is `base_delay_ms × 2^k`, without jitter.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use storyboard_rate_limit::RetryPolicy;
///
/// let delays: Vec<Duration> = RetryPolicy::general().delays().collect();
/// assert_eq!(
///     delays,
///     vec![
///         Duration::from_millis(2000),
///         Duration::from_millis(4000),
///         Duration::from_millis(8000),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    2000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::general()
    }
}

impl RetryPolicy {
    /// Create a policy.
    pub fn new(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
        }
    }

    /// Text and JSON calls: 3 retries at a 2 s base.
    pub fn general() -> Self {
        Self::new(3, 2000)
    }

    /// Image calls: 2 retries at a 2 s base.
    pub fn image() -> Self {
        Self::new(2, 2000)
    }

    /// Speech calls: 2 retries at a 2 s base.
    pub fn speech() -> Self {
        Self::new(2, 2000)
    }

    /// Backoff schedule, one entry per permitted retry.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let base = self.base_delay_ms;
        (0..self.max_retries).map(move |k| {
            let factor = 1u64.checked_shl(k).unwrap_or(u64::MAX);
            Duration::from_millis(base.saturating_mul(factor))
        })
    }

    /// Upper bound on attempts: the first call plus every retry.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Run `operation`, retrying transient failures according to `policy`.
///
/// Non-transient failures return after exactly one attempt. When retries are
/// exhausted the last failure is returned as-is.
///
/// # Example
///
/// ```rust,ignore
/// let response = invoke(RetryPolicy::general(), || async {
///     driver.generate(&request).await
/// })
/// .await?;
/// ```
pub async fn invoke<F, Fut, R, E>(policy: RetryPolicy, operation: F) -> Result<R, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<R, E>>,
    E: RetryableError + std::fmt::Display,
{
    let operation = &operation;
    let attempts = &AtomicU32::new(0);
    let max_attempts = policy.max_attempts();

    Retry::spawn(policy.delays(), move || async move {
        let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(attempt, max_attempts, "Invoking upstream call");

        match operation().await {
            Ok(value) => Ok(value),
            Err(e) if e.is_retryable() => {
                if attempt < max_attempts {
                    warn!(attempt, max_attempts, error = %e, "Transient failure, will retry");
                } else {
                    warn!(attempt, error = %e, "Transient failure, retries exhausted");
                }
                Err(RetryError::Transient {
                    err: e,
                    retry_after: None,
                })
            }
            Err(e) => {
                debug!(attempt, error = %e, "Permanent failure, not retrying");
                Err(RetryError::Permanent(e))
            }
        }
    })
    .await
}
