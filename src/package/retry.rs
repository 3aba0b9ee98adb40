//! Retry policies for network operations.
//!
//! A policy only answers two questions: how many attempts are allowed, and how
//! long to wait after a failed attempt. The caller owns the loop, so the same
//! policy works from async tasks, threads or anything else.

use std::time::Duration;

/// Decides how often and how patiently an operation is retried
pub trait RetryPolicy: Send + Sync {
    /// Total attempts, including the first one. Always at least 1.
    fn max_attempts(&self) -> u32;

    /// Pause after failed attempt number `attempt` (1-based)
    fn delay(&self, attempt: u32) -> Duration;
}

/// `attempt * base_delay` between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearBackoff {
    max_attempts: u32,
    base_delay: Duration,
}

impl LinearBackoff {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Single attempt, no waiting
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for LinearBackoff {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

impl RetryPolicy for LinearBackoff {
    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}
