// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Bounded exponential backoff.
//!
//! The delay doubles after every retryable attempt and is clamped at
//! `max_delay`. For `n = max_attempts` a wait suspends at most
//! `sum_{i=0}^{n-2} min(initial_delay * 2^i, max_delay)`, which
//! [`BackoffPolicy::worst_case_delay`] computes up front. Lookup latency
//! comes on top of that, once per attempt.

use crate::constants::wait::{INITIAL_DELAY_MS, MAX_ATTEMPTS, MAX_DELAY_MS};
use crate::error::WaitError;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(MAX_DELAY_MS),
        }
    }
}

impl BackoffPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay,
        }
    }

    /// Reject bounds the poll loop cannot honour.
    pub fn validate(&self) -> Result<(), WaitError> {
        if self.max_attempts < 1 {
            return Err(WaitError::Configuration(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.initial_delay.is_zero() {
            return Err(WaitError::Configuration(
                "initial_delay must be greater than zero".to_string(),
            ));
        }
        if self.max_delay < self.initial_delay {
            return Err(WaitError::Configuration(format!(
                "max_delay ({:?}) must not be smaller than initial_delay ({:?})",
                self.max_delay, self.initial_delay
            )));
        }
        Ok(())
    }

    pub fn backoff(&self) -> Backoff {
        Backoff {
            next: self.initial_delay,
            max: self.max_delay,
        }
    }

    /// The delays slept between consecutive attempts, `max_attempts - 1` of them.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        self.backoff()
            .take(self.max_attempts.saturating_sub(1) as usize)
    }

    /// Total suspension time of a wait that exhausts every attempt.
    pub fn worst_case_delay(&self) -> Duration {
        self.delays().fold(Duration::ZERO, Duration::saturating_add)
    }
}

/// Infinite sequence of delays: `initial, 2*initial, 4*initial, ...` capped at `max`.
#[derive(Debug, Clone)]
pub struct Backoff {
    next: Duration,
    max: Duration,
}

impl Backoff {
    pub fn next_delay(&mut self) -> Duration {
        let current = self.next.min(self.max);
        self.next = current.saturating_mul(2).min(self.max);
        current
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(self.next_delay())
    }
}
