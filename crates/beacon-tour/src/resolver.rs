#![forbid(unsafe_code)]

//! Target lookup and bounded polling.
//!
//! A step's target may not exist yet: the host is still rendering the view the
//! tour just navigated to. [`ResolvePoll`] retries the lookup on a fixed
//! interval until it succeeds or the deadline passes. It never errors; a
//! missing target is an ordinary [`Resolution::NotFound`].
//!
//! The poll is non-blocking so a host-driven frame loop can advance it;
//! [`await_resolve`] is the blocking form, sleeping on a [`Clock`] between
//! attempts.
//!
//! # Timing
//!
//! With the default [`PollConfig`] (2000 ms / 120 ms) attempts happen at
//! 0, 120, ..., 1920 and a final one exactly at 2000 ms.

use beacon_core::geometry::Rect;
use beacon_runtime::cancellation::CancellationToken;
use beacon_runtime::clock::Clock;
use web_time::Duration;

/// Smallest accepted retry interval; a zero interval would spin.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// First-match lookup of a selector's bounding box, in viewport coordinates.
pub trait TargetResolver {
    fn resolve(&self, selector: &str) -> Option<Rect>;
}

impl<F> TargetResolver for F
where
    F: Fn(&str) -> Option<Rect>,
{
    fn resolve(&self, selector: &str) -> Option<Rect> {
        self(selector)
    }
}

/// Polling limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(2000),
            interval: Duration::from_millis(120),
        }
    }
}

impl PollConfig {
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_POLL_INTERVAL);
        self
    }
}

/// Outcome of a bounded poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    Found(Rect),
    /// The deadline passed without a match.
    NotFound,
    Cancelled,
}

impl Resolution {
    #[must_use]
    pub fn rect(self) -> Option<Rect> {
        match self {
            Self::Found(rect) => Some(rect),
            _ => None,
        }
    }
}

/// Result of one [`ResolvePoll::poll`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PollState {
    /// Call again at or after `next_attempt_at`.
    Waiting { next_attempt_at: Duration },
    Ready(Resolution),
}

/// A single in-flight poll for one selector.
#[derive(Debug, Clone)]
pub struct ResolvePoll {
    selector: String,
    started_at: Duration,
    deadline: Duration,
    interval: Duration,
    next_attempt_at: Duration,
    attempts: u32,
    cancel: Option<CancellationToken>,
    outcome: Option<Resolution>,
}

impl ResolvePoll {
    /// Start polling at `now`; the first attempt is due immediately.
    #[must_use]
    pub fn new(
        selector: impl Into<String>,
        config: PollConfig,
        now: Duration,
        cancel: Option<CancellationToken>,
    ) -> Self {
        Self {
            selector: selector.into(),
            started_at: now,
            deadline: now.saturating_add(config.timeout),
            interval: config.interval.max(MIN_POLL_INTERVAL),
            next_attempt_at: now,
            attempts: 0,
            cancel,
            outcome: None,
        }
    }

    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    #[must_use]
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    #[must_use]
    pub fn next_attempt_at(&self) -> Duration {
        self.next_attempt_at
    }

    /// The settled outcome, if any.
    #[must_use]
    pub fn outcome(&self) -> Option<Resolution> {
        self.outcome
    }

    /// Attempt a lookup if one is due. Once `Ready`, every later call returns
    /// the same resolution without touching the resolver.
    pub fn poll(&mut self, resolver: &dyn TargetResolver, now: Duration) -> PollState {
        if let Some(outcome) = self.outcome {
            return PollState::Ready(outcome);
        }
        if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return self.settle(Resolution::Cancelled);
        }
        if now < self.next_attempt_at {
            return PollState::Waiting {
                next_attempt_at: self.next_attempt_at,
            };
        }

        self.attempts += 1;
        if let Some(rect) = resolver.resolve(&self.selector) {
            tracing::trace!(
                selector = %self.selector,
                attempts = self.attempts,
                "target resolved"
            );
            return self.settle(Resolution::Found(rect));
        }
        if now >= self.deadline {
            tracing::debug!(
                selector = %self.selector,
                attempts = self.attempts,
                waited_ms = now.saturating_sub(self.started_at).as_millis() as u64,
                "target poll timed out"
            );
            return self.settle(Resolution::NotFound);
        }

        self.next_attempt_at = now.saturating_add(self.interval).min(self.deadline);
        PollState::Waiting {
            next_attempt_at: self.next_attempt_at,
        }
    }

    fn settle(&mut self, outcome: Resolution) -> PollState {
        self.outcome = Some(outcome);
        PollState::Ready(outcome)
    }
}

/// Poll `selector` until it resolves, the deadline passes, or `cancel` trips,
/// sleeping on `clock` between attempts.
pub fn await_resolve(
    resolver: &dyn TargetResolver,
    selector: &str,
    config: PollConfig,
    clock: &dyn Clock,
    cancel: Option<&CancellationToken>,
) -> Resolution {
    let mut poll = ResolvePoll::new(selector, config, clock.now(), cancel.cloned());
    loop {
        match poll.poll(resolver, clock.now()) {
            PollState::Ready(resolution) => return resolution,
            PollState::Waiting { next_attempt_at } => {
                let wait = next_attempt_at.saturating_sub(clock.now());
                if clock.sleep(wait, cancel) {
                    return Resolution::Cancelled;
                }
            }
        }
    }
}
