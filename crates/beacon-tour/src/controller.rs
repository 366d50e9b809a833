#![forbid(unsafe_code)]

//! The tour state machine.
//!
//! [`TourController`] moves between `Idle` and `Active { index }`. A move
//! that needs a route change first asks the [`Navigator`], then polls the
//! [`TargetResolver`] for the new step's target; the move commits when the
//! target appears or the poll times out. Until then the transition is
//! *pending*:
//!
//! - `start`, `next` and `previous` return [`Transition::Busy`] and change
//!   nothing;
//! - `skip`, `complete` and `cancel_pending` drop the poll, and a result
//!   delivered for it afterwards is discarded.
//!
//! The controller never blocks on its own. Hosts either call
//! [`TourController::poll`] from their frame loop, or [`TourController::settle`]
//! to sleep on the controller's [`Clock`] until the pending move resolves.
//!
//! # Events
//!
//! Every observable change is queued as a [`TourEvent`] and handed out by
//! [`TourController::drain_events`]:
//!
//! ```text
//! start ─▶ Started ─▶ [TargetMissing]
//! next  ─▶ StepChanged ─▶ [TargetMissing]     past the end ─▶ Finished(Completed)
//! skip  ─▶ Finished(Skipped)
//! ```
//!
//! # Persistence
//!
//! Guided tours write their index on every change and clear it when the tour
//! ends. Skipping a guided tour sets the "tour skipped" flag, which only
//! suppresses automatic offers ([`TourController::should_offer_tour`]); an
//! explicit start always runs.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use beacon_core::error::{BeaconError, clamp_step_index};
use beacon_core::geometry::Rect;
use beacon_runtime::cancellation::CancellationSource;
use beacon_runtime::clock::{Clock, SystemClock};
use beacon_runtime::state_persistence::PersistedState;
use web_time::Duration;

use crate::inspect::inspect_step;
use crate::navigation::{Navigator, needs_navigation};
use crate::resolver::{PollConfig, PollState, ResolvePoll, Resolution, TargetResolver};
use crate::step::TourStep;

/// Which flavor of tour is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TourKind {
    /// Multi-step, persisted and resumable.
    #[default]
    Guided,
    /// Single ephemeral step explaining one thing.
    Contextual,
    /// Single step opened by clicking an annotated element.
    Inspect,
}

impl TourKind {
    #[must_use]
    pub const fn is_persisted(self) -> bool {
        matches!(self, Self::Guided)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TourState {
    #[default]
    Idle,
    Active {
        index: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourAdvanceReason {
    Next,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourOutcome {
    Completed,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourEvent {
    Started {
        kind: TourKind,
        index: usize,
        total: usize,
    },
    StepChanged {
        from: usize,
        to: usize,
        reason: TourAdvanceReason,
    },
    /// The step committed without its target; it renders centered.
    TargetMissing {
        index: usize,
        selector: String,
    },
    Finished {
        kind: TourKind,
        outcome: TourOutcome,
    },
}

/// Immediate result of a state-changing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The change took effect; the payload is the new state.
    Committed(TourState),
    /// Navigation was requested and the target is being polled.
    Pending { route: String, ticket: u64 },
    /// Another transition is pending; nothing changed.
    Busy,
    /// Nothing to do (no tour, first step, empty list, ...).
    Ignored,
}

impl Transition {
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

#[derive(Debug)]
enum PendingAction {
    Start {
        steps: Vec<TourStep>,
        kind: TourKind,
        index: usize,
    },
    Move {
        from: usize,
        to: usize,
        reason: TourAdvanceReason,
    },
}

impl PendingAction {
    fn kind(&self, active: TourKind) -> TourKind {
        match self {
            Self::Start { kind, .. } => *kind,
            Self::Move { .. } => active,
        }
    }
}

#[derive(Debug)]
struct PendingTransition {
    ticket: u64,
    route: String,
    action: PendingAction,
    poll: ResolvePoll,
    source: CancellationSource,
}

impl PendingTransition {
    fn cancel(self) {
        self.source.cancel();
    }
}

pub struct TourController {
    state: TourState,
    kind: TourKind,
    steps: Vec<TourStep>,
    navigator: Box<dyn Navigator>,
    resolver: Box<dyn TargetResolver>,
    clock: Arc<dyn Clock>,
    persisted: Option<Arc<PersistedState>>,
    poll_config: PollConfig,
    pending: Option<PendingTransition>,
    next_ticket: u64,
    events: VecDeque<TourEvent>,
}

impl TourController {
    #[must_use]
    pub fn new(navigator: Box<dyn Navigator>, resolver: Box<dyn TargetResolver>) -> Self {
        Self {
            state: TourState::Idle,
            kind: TourKind::Guided,
            steps: Vec::new(),
            navigator,
            resolver,
            clock: Arc::new(SystemClock::new()),
            persisted: None,
            poll_config: PollConfig::default(),
            pending: None,
            next_ticket: 0,
            events: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_persistence(mut self, persisted: Arc<PersistedState>) -> Self {
        self.persisted = Some(persisted);
        self
    }

    #[must_use]
    pub fn with_poll_config(mut self, config: PollConfig) -> Self {
        self.poll_config = config;
        self
    }

    // ── Queries ─────────────────────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> TourState {
        self.state
    }

    #[must_use]
    pub fn kind(&self) -> TourKind {
        self.kind
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, TourState::Active { .. })
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Route being navigated to, while a transition is pending.
    #[must_use]
    pub fn pending_route(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.route.as_str())
    }

    #[must_use]
    pub fn steps(&self) -> &[TourStep] {
        &self.steps
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            TourState::Active { index } => Some(index),
            TourState::Idle => None,
        }
    }

    #[must_use]
    pub fn current_step(&self) -> Option<&TourStep> {
        self.steps.get(self.current_index()?)
    }

    /// Bounding box of the current step's target, looked up now.
    #[must_use]
    pub fn target_rect(&self) -> Option<Rect> {
        let selector = self.current_step()?.target.as_deref()?;
        self.resolver.resolve(selector)
    }

    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    #[must_use]
    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    /// False once the user skipped a guided tour; hosts use it to decide
    /// whether to offer the tour unprompted.
    #[must_use]
    pub fn should_offer_tour(&self) -> bool {
        !self.persisted.as_ref().is_some_and(|p| p.tour_skipped())
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<TourEvent> {
        self.events.drain(..).collect()
    }

    // ── Starting ────────────────────────────────────────────────────────

    /// Start a guided tour at `initial` (clamped).
    pub fn start(&mut self, steps: Vec<TourStep>, initial: usize) -> Transition {
        self.begin(steps, initial, TourKind::Guided)
    }

    /// Start a guided tour where the user left it.
    pub fn resume_guided(&mut self, steps: Vec<TourStep>) -> Transition {
        let initial = self
            .persisted
            .as_ref()
            .and_then(|p| p.guided_step())
            .filter(|&i| i < steps.len())
            .unwrap_or(0);
        self.begin(steps, initial, TourKind::Guided)
    }

    /// Show a single ephemeral step.
    pub fn start_contextual(&mut self, step: TourStep) -> Transition {
        self.begin(vec![step], 0, TourKind::Contextual)
    }

    /// Explain the element annotated with `value`.
    pub fn start_inspect(&mut self, value: &str) -> Transition {
        self.begin(vec![inspect_step(value)], 0, TourKind::Inspect)
    }

    fn begin(&mut self, steps: Vec<TourStep>, initial: usize, kind: TourKind) -> Transition {
        if self.pending.is_some() {
            tracing::debug!(?kind, "tour start ignored, transition in flight");
            return Transition::Busy;
        }
        if steps.is_empty() {
            tracing::debug!(?kind, "tour start ignored, no steps");
            return Transition::Ignored;
        }
        let index = self.clamp_index(initial, steps.len());
        let step = &steps[index];
        let route = needs_navigation(
            step.route.as_deref(),
            &self.navigator.current_route(),
            None,
        );
        let selector = step.target.clone();
        self.dispatch(route, selector, PendingAction::Start { steps, kind, index })
    }

    // ── Moving ──────────────────────────────────────────────────────────

    pub fn next(&mut self) -> Transition {
        match self.state {
            TourState::Active { index } => self.next_from(index),
            TourState::Idle => self.guard_idle(),
        }
    }

    /// Advance from the step the caller is showing. Past the last step the
    /// tour completes.
    pub fn next_from(&mut self, index: usize) -> Transition {
        if self.pending.is_some() {
            return Transition::Busy;
        }
        if !self.is_active() {
            return Transition::Ignored;
        }
        let from = self.clamp_index(index, self.steps.len());
        let to = from + 1;
        if to >= self.steps.len() {
            self.finish(TourOutcome::Completed);
            return Transition::Committed(TourState::Idle);
        }
        self.move_to(from, to, TourAdvanceReason::Next)
    }

    pub fn previous(&mut self) -> Transition {
        match self.state {
            TourState::Active { index } => self.previous_from(index),
            TourState::Idle => self.guard_idle(),
        }
    }

    /// Step back from the step the caller is showing. No-op on the first step.
    pub fn previous_from(&mut self, index: usize) -> Transition {
        if self.pending.is_some() {
            return Transition::Busy;
        }
        if !self.is_active() {
            return Transition::Ignored;
        }
        let from = self.clamp_index(index, self.steps.len());
        if from == 0 {
            return Transition::Ignored;
        }
        self.move_to(from, from - 1, TourAdvanceReason::Previous)
    }

    fn move_to(&mut self, from: usize, to: usize, reason: TourAdvanceReason) -> Transition {
        let route = needs_navigation(
            self.steps[to].route.as_deref(),
            &self.navigator.current_route(),
            self.steps[from].route.as_deref(),
        );
        let selector = self.steps[to].target.clone();
        self.dispatch(route, selector, PendingAction::Move { from, to, reason })
    }

    fn guard_idle(&self) -> Transition {
        if self.pending.is_some() {
            Transition::Busy
        } else {
            Transition::Ignored
        }
    }

    /// Commit now, or navigate and go pending when the target has to appear.
    fn dispatch(
        &mut self,
        route: Option<String>,
        selector: Option<String>,
        action: PendingAction,
    ) -> Transition {
        let Some(route) = route else {
            self.commit(action, None);
            return Transition::Committed(self.state);
        };
        tracing::debug!(route = %route, "navigating before step");
        self.navigator.navigate(&route);

        let Some(selector) = selector else {
            self.commit(action, None);
            return Transition::Committed(self.state);
        };

        self.next_ticket = self.next_ticket.wrapping_add(1);
        let source = CancellationSource::new();
        let poll = ResolvePoll::new(
            selector,
            self.poll_config,
            self.clock.now(),
            Some(source.token()),
        );
        self.pending = Some(PendingTransition {
            ticket: self.next_ticket,
            route,
            action,
            poll,
            source,
        });
        // The target may already be there.
        self.poll()
    }

    // ── Pending transitions ─────────────────────────────────────────────

    /// Advance the pending transition, if any. Returns `Pending` while still
    /// waiting, the committed state once resolved, `Ignored` otherwise.
    pub fn poll(&mut self) -> Transition {
        let now = self.clock.now();
        let resolver = self.resolver.as_ref();
        let Some(pending) = self.pending.as_mut() else {
            return Transition::Ignored;
        };
        match pending.poll.poll(resolver, now) {
            PollState::Waiting { .. } => Transition::Pending {
                route: pending.route.clone(),
                ticket: pending.ticket,
            },
            PollState::Ready(resolution) => match self.pending.take() {
                Some(pending) => self.resolve(pending, resolution, now),
                None => Transition::Ignored,
            },
        }
    }

    /// Block until the pending transition resolves.
    pub fn settle(&mut self) -> Transition {
        loop {
            match self.poll() {
                Transition::Pending { .. } => {
                    let Some(pending) = self.pending.as_ref() else {
                        continue;
                    };
                    let wait = pending
                        .poll
                        .next_attempt_at()
                        .saturating_sub(self.clock.now());
                    let token = pending.source.token();
                    self.clock.sleep(wait, Some(&token));
                }
                other => return other,
            }
        }
    }

    /// Deliver a resolution computed by the host (e.g. from a DOM observer).
    /// Returns false, discarding the result, when `ticket` is not the
    /// transition currently pending.
    pub fn resolve_pending(&mut self, ticket: u64, resolution: Resolution) -> bool {
        if self.pending.as_ref().map(|p| p.ticket) != Some(ticket) {
            tracing::debug!(ticket, "discarding stale target resolution");
            return false;
        }
        let now = self.clock.now();
        match self.pending.take() {
            Some(pending) => {
                pending.source.cancel();
                self.resolve(pending, resolution, now);
                true
            }
            None => false,
        }
    }

    /// Drop the pending transition without committing it (the host
    /// navigated elsewhere). The current step, if any, stays.
    pub fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                tracing::debug!(route = %pending.route, "pending step transition cancelled");
                pending.cancel();
                true
            }
            None => false,
        }
    }

    fn resolve(
        &mut self,
        pending: PendingTransition,
        resolution: Resolution,
        now: Duration,
    ) -> Transition {
        match resolution {
            Resolution::Found(_) => {
                self.commit(pending.action, None);
                Transition::Committed(self.state)
            }
            Resolution::NotFound => {
                let err = BeaconError::NavigationTimeout {
                    route: pending.route.clone(),
                    waited: now.saturating_sub(pending.poll.started_at()),
                };
                tracing::warn!(
                    error = %err,
                    selector = %pending.poll.selector(),
                    degradation = ?err.degradation(),
                    "step target never appeared, showing step without it"
                );
                let selector = pending.poll.selector().to_owned();
                self.commit(pending.action, Some(selector));
                Transition::Committed(self.state)
            }
            Resolution::Cancelled => {
                tracing::debug!(route = %pending.route, "target poll cancelled");
                Transition::Ignored
            }
        }
    }

    fn commit(&mut self, action: PendingAction, missing: Option<String>) {
        let index = match action {
            PendingAction::Start { steps, kind, index } => {
                if self.is_active() {
                    tracing::debug!(old = ?self.kind, new = ?kind, "replacing running tour");
                    if self.kind.is_persisted() && !kind.is_persisted() {
                        self.with_persisted(|p| p.clear_guided_step());
                    }
                }
                let total = steps.len();
                self.steps = steps;
                self.kind = kind;
                self.state = TourState::Active { index };
                self.events.push_back(TourEvent::Started { kind, index, total });
                index
            }
            PendingAction::Move { from, to, reason } => {
                self.state = TourState::Active { index: to };
                self.events
                    .push_back(TourEvent::StepChanged { from, to, reason });
                to
            }
        };
        if self.kind.is_persisted() {
            self.with_persisted(|p| p.set_guided_step(index));
        }
        if let Some(selector) = missing {
            self.events
                .push_back(TourEvent::TargetMissing { index, selector });
        }
        tracing::debug!(kind = ?self.kind, index, total = self.steps.len(), "tour step committed");
    }

    // ── Ending ──────────────────────────────────────────────────────────

    /// End the tour from any state, cancelling any pending transition.
    /// Returns false when there was nothing to skip.
    pub fn skip(&mut self) -> bool {
        self.finish(TourOutcome::Skipped)
    }

    /// End the tour as completed.
    pub fn complete(&mut self) -> bool {
        self.finish(TourOutcome::Completed)
    }

    fn finish(&mut self, outcome: TourOutcome) -> bool {
        let pending = self.pending.take();
        let was_active = self.is_active();
        // Either the running tour or the start being abandoned may be guided.
        let ends_guided = (was_active && self.kind.is_persisted())
            || pending
                .as_ref()
                .is_some_and(|p| p.action.kind(self.kind).is_persisted());
        if let Some(pending) = pending {
            pending.cancel();
        } else if !was_active {
            return false;
        }

        if ends_guided {
            self.with_persisted(|p| {
                p.clear_guided_step();
                if outcome == TourOutcome::Skipped {
                    p.set_tour_skipped(true);
                }
            });
        }
        if was_active {
            let ending = self.kind;
            self.events.push_back(TourEvent::Finished {
                kind: ending,
                outcome,
            });
            tracing::debug!(kind = ?ending, ?outcome, "tour finished");
        }
        self.state = TourState::Idle;
        self.steps.clear();
        true
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    fn clamp_index(&self, index: usize, len: usize) -> usize {
        let (clamped, err) = clamp_step_index(index, len);
        if let Some(err) = err {
            tracing::debug!(error = %err, clamped, "step index clamped");
        }
        clamped
    }

    fn with_persisted(&self, f: impl FnOnce(&PersistedState)) {
        if let Some(persisted) = self.persisted.as_deref() {
            f(persisted);
        }
    }
}

impl fmt::Debug for TourController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourController")
            .field("state", &self.state)
            .field("kind", &self.kind)
            .field("steps", &self.steps.len())
            .field("pending", &self.pending_route())
            .finish()
    }
}
