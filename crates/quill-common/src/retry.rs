//! Retry policy for transient transport failures.
//!
//! Built on `tokio-retry`; the policy only decides how many attempts are made
//! and how long to wait between them. Whether an error is worth retrying is
//! decided by the caller.

use std::future::Future;
use std::time::Duration;
use tokio_retry::strategy::{ExponentialBackoff, FixedInterval};
use tokio_retry::RetryIf;
use tracing::{debug, warn};

/// Wait schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed(Duration),
    /// `base * 2^n`, capped at `max`.
    Exponential {
        /// Delay unit, doubled on every retry.
        base: Duration,
        /// Upper bound for a single delay.
        max: Duration,
    },
}

/// How often and how patiently to retry an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero behaves like one.
    pub max_attempts: usize,
    /// Delay schedule between attempts.
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(3, Duration::from_secs(2))
    }
}

impl RetryPolicy {
    /// Fixed delay between attempts.
    pub const fn fixed(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed(delay),
        }
    }

    /// Doubling delay between attempts.
    pub const fn exponential(max_attempts: usize, base: Duration, max: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Exponential { base, max },
        }
    }

    /// A single attempt, no retries.
    pub const fn none() -> Self {
        Self::fixed(1, Duration::ZERO)
    }

    /// The delays slept before each retry, in order.
    pub fn delays(&self) -> Vec<Duration> {
        let retries = self.max_attempts.saturating_sub(1);
        match self.backoff {
            Backoff::Fixed(delay) => {
                let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                FixedInterval::from_millis(millis).take(retries).collect()
            }
            Backoff::Exponential { base, max } => {
                let millis = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
                ExponentialBackoff::from_millis(2)
                    .factor(millis)
                    .max_delay(max)
                    .take(retries)
                    .collect()
            }
        }
    }

    /// Runs `action` until it succeeds, fails permanently, or attempts run out.
    ///
    /// `is_transient` is consulted for every failure; returning `false` stops
    /// immediately with that error.
    pub async fn run<A, Fut, T, E, C>(&self, mut action: A, mut is_transient: C) -> Result<T, E>
    where
        A: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: FnMut(&E) -> bool,
        E: std::fmt::Display,
    {
        let mut attempt = 0usize;
        let attempts = self.max_attempts.max(1);

        RetryIf::start(
            self.delays(),
            || {
                attempt += 1;
                debug!("Attempt {}/{}", attempt, attempts);
                action()
            },
            |err: &E| {
                let transient = is_transient(err);
                if transient {
                    warn!("Transient failure: {}", err);
                } else {
                    debug!("Permanent failure, not retrying: {}", err);
                }
                transient
            },
        )
        .await
    }
}
