#![forbid(unsafe_code)]

//! Monotonic clocks for target polling and click cooldowns.
//!
//! Every time-dependent decision reads time through [`Clock`], so tests drive
//! the tour with a [`ManualClock`] and never sleep for real.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use web_time::Duration;

use crate::cancellation::CancellationToken;

/// Monotonic time source that can also wait.
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's epoch.
    fn now(&self) -> Duration;

    /// Wait for `duration`, returning early with `true` if `cancel` trips.
    fn sleep(&self, duration: Duration, cancel: Option<&CancellationToken>) -> bool;
}

// ── System ──────────────────────────────────────────────────────────────

/// Wall-clock monotonic time backed by `web_time::Instant`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: web_time::Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: web_time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn sleep(&self, duration: Duration, cancel: Option<&CancellationToken>) -> bool {
        match cancel {
            Some(token) => token.wait_timeout(duration),
            None => {
                std::thread::sleep(duration);
                false
            }
        }
    }
}

// ── Manual ──────────────────────────────────────────────────────────────

/// Deterministic clock. `sleep` advances time instantly.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
    sleeps: AtomicU64,
}

impl ManualClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set current time. Moving backwards is allowed; callers own the consequences.
    pub fn set(&self, now: Duration) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    /// Advance time by `dt`.
    pub fn advance(&self, dt: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = now.saturating_add(dt);
    }

    /// Number of `sleep` calls observed.
    #[must_use]
    pub fn sleep_count(&self) -> u64 {
        self.sleeps.load(Ordering::Relaxed)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn sleep(&self, duration: Duration, cancel: Option<&CancellationToken>) -> bool {
        self.sleeps.fetch_add(1, Ordering::Relaxed);
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return true;
        }
        self.advance(duration);
        cancel.is_some_and(CancellationToken::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancellation::CancellationSource;

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn system_sleep_wakes_on_cancel() {
        let clock = SystemClock::default();
        let source = CancellationSource::new();
        source.cancel();
        assert!(clock.sleep(Duration::from_secs(30), Some(&source.token())));
    }

    #[test]
    fn manual_clock_sleep_advances_time() {
        let clock = ManualClock::new();
        assert!(!clock.sleep(Duration::from_millis(120), None));
        assert_eq!(clock.now(), Duration::from_millis(120));
        assert_eq!(clock.sleep_count(), 1);
    }

    #[test]
    fn manual_clock_set_and_advance() {
        let clock = ManualClock::new();
        clock.set(Duration::from_secs(2));
        clock.advance(Duration::from_millis(500));
        assert_eq!(clock.now(), Duration::from_millis(2500));
    }

    #[test]
    fn manual_sleep_cancelled_does_not_advance() {
        let clock = ManualClock::new();
        let source = CancellationSource::new();
        source.cancel();
        assert!(clock.sleep(Duration::from_millis(50), Some(&source.token())));
        assert_eq!(clock.now(), Duration::ZERO);
    }
}
