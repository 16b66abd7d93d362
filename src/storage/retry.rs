//! Bounded retries with linear backoff.

use std::thread;
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShukuyakuError};

/// How often and how patiently a failed store write is retried.
///
/// After the `n`-th failure the policy waits `n * base_delay_ms`, capped at
/// `max_delay_ms`, before trying again. With the defaults a batch is tried
/// four times in total, waiting 1 s, 2 s and 3 s in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 10_000,
        }
    }
}

impl RetryPolicy {
    /// A policy that retries immediately.
    pub fn immediate(max_retries: u32) -> Self {
        RetryPolicy {
            max_retries,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    /// Total number of attempts, including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let millis = self
            .base_delay_ms
            .saturating_mul(u64::from(retry))
            .min(self.max_delay_ms);
        Duration::from_millis(millis)
    }

    /// Run `operation` until it succeeds or the retries are exhausted.
    ///
    /// The closure receives the 1-based attempt number. Exhaustion is
    /// reported as [`ShukuyakuError::Persistence`] carrying `label` and the
    /// last error.
    pub fn run<T, F>(&self, label: &str, mut operation: F) -> Result<T>
    where
        F: FnMut(u32) -> Result<T>,
    {
        let mut retry = 0;
        loop {
            match operation(retry + 1) {
                Ok(value) => return Ok(value),
                Err(e) if retry >= self.max_retries => {
                    return Err(ShukuyakuError::persistence(format!(
                        "{label} failed after {} retries: {e}",
                        self.max_retries
                    )));
                }
                Err(e) => {
                    retry += 1;
                    warn!("{label} failed, retry {retry}/{}: {e}", self.max_retries);
                    thread::sleep(self.delay_for(retry));
                }
            }
        }
    }
}
