//! Submission rate heuristic
//!
//! Purely in-page: nothing server-side enforces these limits.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SUBMISSIONS_PER_WINDOW, MIN_SUBMISSION_INTERVAL_MS, RATE_WINDOW_MS};

/// Counts accepted submissions inside the current hourly window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiter {
    /// Accepted submissions since the last reset
    pub count: u32,
    /// Timestamp (ms) of the last accepted submission, 0 if none
    pub last_submission_ms: u64,
    /// Timestamp (ms) the current window opened
    pub window_started_ms: u64,
}

impl RateLimiter {
    pub fn new(now_ms: u64) -> Self {
        Self {
            count: 0,
            last_submission_ms: 0,
            window_started_ms: now_ms,
        }
    }

    /// Whether another submission may go through at `now_ms`
    pub fn allows(&self, now_ms: u64) -> bool {
        if self.count >= MAX_SUBMISSIONS_PER_WINDOW {
            return false;
        }
        now_ms.saturating_sub(self.last_submission_ms) >= MIN_SUBMISSION_INTERVAL_MS
    }

    /// Record an accepted submission
    pub fn record(&mut self, now_ms: u64) {
        self.count += 1;
        self.last_submission_ms = now_ms;
    }

    /// Clear the counter (hourly timer)
    pub fn reset(&mut self, now_ms: u64) {
        self.count = 0;
        self.window_started_ms = now_ms;
        log::info!("Rate limit counter reset");
    }

    /// Reset if a full window has elapsed since it opened.
    /// Returns true when a reset happened.
    pub fn maybe_reset(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.window_started_ms) >= RATE_WINDOW_MS {
            self.reset(now_ms);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: u64 = 1_700_000_000_000;

    #[test]
    fn test_fresh_limiter_allows() {
        let limiter = RateLimiter::new(T0);
        assert!(limiter.allows(T0));
    }

    #[test]
    fn test_min_interval() {
        let mut limiter = RateLimiter::new(T0);
        limiter.record(T0);
        assert!(!limiter.allows(T0 + 29_999));
        assert!(limiter.allows(T0 + 30_000));
    }

    #[test]
    fn test_sixth_rejected_regardless_of_elapsed() {
        let mut limiter = RateLimiter::new(T0);
        for i in 0..5 {
            limiter.record(T0 + i);
        }
        assert!(!limiter.allows(T0 + 10));
        // Even long after the last one, until the window resets
        assert!(!limiter.allows(T0 + RATE_WINDOW_MS - 1));
    }

    #[test]
    fn test_window_reset() {
        let mut limiter = RateLimiter::new(T0);
        for i in 0..5 {
            limiter.record(T0 + i * 40_000);
        }
        assert!(!limiter.maybe_reset(T0 + RATE_WINDOW_MS - 1));
        assert!(limiter.maybe_reset(T0 + RATE_WINDOW_MS));
        assert_eq!(limiter.count, 0);
        assert!(limiter.allows(T0 + RATE_WINDOW_MS));
    }
}
