// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::config::BackoffConfig;
use std::time::Duration;

/// Exponential backoff between watch attempts.
///
/// After `n` earlier consecutive failures the delay is `min(max, initial * factor^n)`,
/// so the first failure of a streak waits exactly `initial`.
#[derive(Debug, Clone)]
pub struct Backoff {
    config: BackoffConfig,
    failures: u32,
}

impl Backoff {
    pub fn new(config: BackoffConfig) -> Self {
        Self {
            config,
            failures: 0,
        }
    }

    /// Delay to wait after another failure; grows the streak.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.delay_for(self.failures);
        self.failures = self.failures.saturating_add(1);
        delay
    }

    /// Back to the initial delay
    pub fn reset(&mut self) {
        self.failures = 0;
    }

    /// Consecutive failures in the current streak
    pub fn failures(&self) -> u32 {
        self.failures
    }

    fn delay_for(&self, failures: u32) -> Duration {
        let exponent = failures.min(i32::MAX as u32) as i32;
        let secs = self.config.initial.as_secs_f64() * self.config.factor.powi(exponent);

        if !secs.is_finite() || secs >= self.config.max.as_secs_f64() {
            self.config.max
        } else {
            Duration::from_secs_f64(secs)
        }
    }
}
