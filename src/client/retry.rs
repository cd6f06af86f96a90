use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::time::Instant;

/// Exponential backoff with additive jitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Jitter is drawn uniformly from `0..max_jitter`.
    pub max_jitter: Duration,
}

impl RetryPolicy {
    /// Backoff after the zero-based `attempt` failed, excluding jitter: `base * 2^attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        1u32.checked_shl(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }

    /// Random jitter in `0..max_jitter`.
    pub fn jitter(&self) -> Duration {
        let max = self.max_jitter.as_millis() as u64;
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..max))
    }
}

/// Progress of one request through its attempt budget.
#[derive(Clone, Copy, Debug)]
pub struct RetryState {
    /// Zero-based index of the attempt in flight.
    pub attempt: u32,
    /// Backoff that will follow the current attempt if it fails, before jitter.
    pub current_delay: Duration,
    /// When the request started.
    pub started_at: Instant,
}

impl RetryState {
    /// State for the first attempt.
    pub fn start(policy: &RetryPolicy) -> Self {
        Self {
            attempt: 0,
            current_delay: policy.backoff(0),
            started_at: Instant::now(),
        }
    }

    /// Whether the attempt in flight is the last one allowed.
    pub fn is_last(&self, policy: &RetryPolicy) -> bool {
        self.attempt + 1 >= policy.max_attempts
    }

    /// Move to the next attempt, doubling the delay.
    pub fn advance(&mut self, policy: &RetryPolicy) {
        self.attempt += 1;
        self.current_delay = policy.backoff(self.attempt);
    }
}

/// Suspends the caller between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/client/retry.rs"]
mod tests;
