//! Fixed-interval pacing for sequential batches.
//!
//! A [`Pacer`] is a GCRA gate with a one-cell burst: the first unit starts
//! immediately and every later unit starts no sooner than one interval after the
//! previous one. Time spent inside a unit counts toward the interval.
//!
//! Units are paced by start time, not by idle gap: a unit that runs longer
//! than the interval is followed by the next one with no pause at all.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Spaces the start of successive units by a fixed interval.
///
/// # Example
///
/// ```rust,ignore
/// let pacer = Pacer::from_millis(2000);
/// for unit in units {
///     pacer.ready().await;
///     process(unit).await;
/// }
/// ```
#[derive(Clone)]
pub struct Pacer {
    interval: Duration,
    limiter: Option<Arc<DirectRateLimiter>>,
}

impl Pacer {
    /// Create a pacer. A zero interval disables pacing.
    pub fn new(interval: Duration) -> Self {
        let limiter = Quota::with_period(interval).map(|quota| Arc::new(RateLimiter::direct(quota)));
        Self { interval, limiter }
    }

    /// Create a pacer from an interval in milliseconds.
    pub fn from_millis(interval_ms: u64) -> Self {
        Self::new(Duration::from_millis(interval_ms))
    }

    /// A pacer that never waits.
    pub fn unpaced() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Configured spacing.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next unit may start.
    pub async fn ready(&self) {
        if let Some(limiter) = &self.limiter {
            trace!(interval_ms = self.interval.as_millis() as u64, "Awaiting pacer");
            limiter.until_ready().await;
        }
    }
}

impl std::fmt::Debug for Pacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pacer")
            .field("interval", &self.interval)
            .field("enabled", &self.limiter.is_some())
            .finish()
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::unpaced()
    }
}
