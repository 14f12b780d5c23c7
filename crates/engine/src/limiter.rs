// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed delay between consecutive operation calls.
//!
//! Not a token bucket: every wait is the full interval, with no memory of
//! earlier calls.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// How a [`RateLimiter::wait`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    Elapsed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self { min_interval }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Suspend for at least the minimum interval, or until `cancel` fires.
    pub async fn wait(&self, cancel: &CancellationToken) -> Pause {
        if cancel.is_cancelled() {
            return Pause::Cancelled;
        }
        if self.min_interval.is_zero() {
            return Pause::Elapsed;
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Pause::Cancelled,
            _ = tokio::time::sleep(self.min_interval) => Pause::Elapsed,
        }
    }
}

#[cfg(test)]
#[path = "limiter_tests.rs"]
mod tests;
