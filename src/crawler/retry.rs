//! Bounded retries with backoff and cancellation
//!
//! Every retried operation in the crawler (listing page loads, item page
//! loads, hover probes) goes through [`RetryRunner::run`]. The runner checks
//! the run's cancellation token before each attempt and during each backoff
//! sleep, so no attempt ever starts after cancellation.

use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// How the delay between attempts grows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Doubles on every retry, starting at the base delay
    Exponential,
    /// Always the base delay
    Fixed,
}

/// Retry budget for one kind of operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Exponential policy: the delay before attempt k (k >= 2) is `base * 2^(k-2)`
    pub fn exponential(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            backoff: Backoff::Exponential,
        }
    }

    /// Fixed policy: every retry waits `delay`
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay: delay,
            backoff: Backoff::Fixed,
        }
    }

    /// Delay slept after failed attempt `failed_attempt` (1-based)
    pub fn backoff_delay(&self, failed_attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.base_delay,
            Backoff::Exponential => {
                let exponent = failed_attempt.saturating_sub(1).min(31);
                self.base_delay.saturating_mul(1u32 << exponent)
            }
        }
    }

    /// Total time slept by an operation that fails every attempt
    pub fn total_backoff(&self) -> Duration {
        (1..self.max_attempts).map(|attempt| self.backoff_delay(attempt)).sum()
    }
}

/// Why a retried operation gave up
#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("cancelled")]
    Cancelled,

    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },
}

/// Runs fallible async operations under a [`RetryPolicy`]
#[derive(Debug, Clone)]
pub struct RetryRunner {
    cancel: CancellationToken,
}

impl RetryRunner {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// The token observed by this runner
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Sleeps for `duration` unless the run is cancelled first
    ///
    /// Returns false if the sleep was cut short by cancellation.
    pub async fn pause(&self, duration: Duration) -> bool {
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }

    /// Calls `operation` until it succeeds or the policy is exhausted
    ///
    /// `operation` receives the 1-based attempt number. Every error is
    /// retried; the last one is returned inside [`RetryError::Exhausted`].
    ///
    /// # Arguments
    ///
    /// * `policy` - Attempt budget and backoff
    /// * `label` - What is being attempted, for the logs
    /// * `operation` - The fallible operation
    pub async fn run<T, E, F, Fut>(
        &self,
        policy: &RetryPolicy,
        label: &str,
        mut operation: F,
    ) -> Result<T, RetryError<E>>
    where
        E: Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            if self.cancel.is_cancelled() {
                tracing::info!(label, attempt, "Cancelled before attempt");
                return Err(RetryError::Cancelled);
            }

            tracing::debug!(label, attempt, max_attempts, "Attempt starting");
            let started = Instant::now();

            let error = match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            tracing::warn!(
                label,
                attempt,
                max_attempts,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Attempt failed: {}",
                error
            );

            if attempt >= max_attempts {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: error,
                });
            }

            let delay = policy.backoff_delay(attempt);
            tracing::info!(label, delay_ms = delay.as_millis() as u64, "Retrying");

            if !self.pause(delay).await {
                tracing::info!(label, attempt, "Cancelled during backoff");
                return Err(RetryError::Cancelled);
            }

            attempt += 1;
        }
    }
}
