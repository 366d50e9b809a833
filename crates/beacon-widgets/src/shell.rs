#![forbid(unsafe_code)]

//! The floating widget: anchor, docking, and the tour overlay.
//!
//! [`FloatingShell`] owns one widget instance. It routes pointer input on the
//! anchor to the [`DragController`], forwards tour commands to the
//! [`TourController`], and turns tour events into [`ShellEvent`]s for the
//! host. All page side effects (opening the chat, highlighting, scrolling,
//! simulated clicks) leave through the [`EventSink`]; route changes leave
//! through the tour's [`Navigator`](beacon_tour::Navigator).
//!
//! # Closed, pinned, docked
//!
//! | Operation | closed | pinned (docked) | anchor |
//! |-----------|--------|-----------------|--------|
//! | `close()` | set | yes, at the default dock | docked |
//! | `pin_at(dock)` | only while closed | yes | docked at `dock` |
//! | `unpin()` | unchanged | no | persisted free position |
//! | `reopen()` | cleared | no | persisted free position |
//!
//! The closed flag is persisted; a reload of a closed widget comes back
//! docked.
//!
//! # Frame loop
//!
//! ```text
//! host input ─▶ on_* / tour commands ─▶ events ─▶ EventSink
//! each frame ─▶ tick() ─▶ poll pending tour move ─▶ overlay()
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use beacon_core::error::BeaconError;
use beacon_core::event::PointerEvent;
use beacon_core::geometry::{Point, Rect, Size, Viewport};
use beacon_layout::invalidation::{Invalidation, LayoutScheduler};
use beacon_layout::overlay::{is_outside, progress_percent, scroll_into_view_delta, SCROLL_MARGIN};
use beacon_layout::placement::{PlacementConfig, Side};
use beacon_runtime::clock::Clock;
use beacon_runtime::state_persistence::PersistedState;
use beacon_tour::inspect::INSPECT_ANY_SELECTOR;
use beacon_tour::{
    InspectConfig, InspectDecision, InspectGate, InspectTarget, Navigator, PollConfig, StepAction,
    TargetResolver, TourController, TourEvent, TourKind, TourOutcome, TourStep, Transition,
};
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::anchor::{AnchorPosition, DockSpec};
use crate::decoration::{Decoration, DecorationSet};
use crate::drag::{DragConfig, DragController, DragOutcome, millis};

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// Side effects requested from the host.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    OpenChat,
    /// The widget left the closed state.
    EnableWidget,
    TourStarted {
        kind: TourKind,
        total: usize,
    },
    TourStepChanged {
        from: usize,
        to: usize,
        total: usize,
    },
    TourFinished {
        kind: TourKind,
        outcome: TourOutcome,
    },
    /// The step is showing without its target.
    TargetMissing {
        index: usize,
        selector: String,
    },
    /// Run a step's action once it is active.
    StepAction {
        action: StepAction,
        target: Option<String>,
    },
    ApplyDecoration(Decoration),
    RevertDecoration(Decoration),
    /// Scroll the page vertically so target and card are visible.
    ScrollBy {
        delta: f64,
    },
}

/// Receiver for [`ShellEvent`]s.
pub trait EventSink {
    fn emit(&mut self, event: ShellEvent);
}

impl<F> EventSink for F
where
    F: FnMut(ShellEvent),
{
    fn emit(&mut self, event: ShellEvent) {
        self(event);
    }
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: ShellEvent) {}
}

/// Sink that records events; clones share one log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<ShellEvent>>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every recorded event, oldest first.
    pub fn take(&self) -> Vec<ShellEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: ShellEvent) {
        self.events.borrow_mut().push(event);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Widget configuration; every field has a default, so an empty JSON object
/// is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub placement: PlacementConfig,
    pub drag: DragConfig,
    /// Dock used when the widget is closed.
    pub default_dock: DockSpec,
    #[serde(with = "millis")]
    pub poll_timeout: Duration,
    #[serde(with = "millis")]
    pub poll_interval: Duration,
    #[serde(with = "millis")]
    pub inspect_debounce: Duration,
    #[serde(with = "millis")]
    pub href_suspension: Duration,
    /// A press outside the tooltip and target skips the tour.
    pub outside_click_skips: bool,
    pub scroll_margin: f64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        let poll = PollConfig::default();
        let inspect = InspectConfig::default();
        Self {
            placement: PlacementConfig::default(),
            drag: DragConfig::default(),
            default_dock: DockSpec::bottom_right(24.0),
            poll_timeout: poll.timeout,
            poll_interval: poll.interval,
            inspect_debounce: inspect.debounce,
            href_suspension: inspect.href_suspension,
            outside_click_skips: true,
            scroll_margin: SCROLL_MARGIN,
        }
    }
}

impl ShellConfig {
    #[must_use]
    pub fn placement(mut self, placement: PlacementConfig) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn drag(mut self, drag: DragConfig) -> Self {
        self.drag = drag;
        self
    }

    #[must_use]
    pub fn default_dock(mut self, dock: DockSpec) -> Self {
        self.default_dock = dock;
        self
    }

    #[must_use]
    pub fn outside_click_skips(mut self, skips: bool) -> Self {
        self.outside_click_skips = skips;
        self
    }

    #[must_use]
    pub fn poll_config(&self) -> PollConfig {
        PollConfig::default()
            .timeout(self.poll_timeout)
            .interval(self.poll_interval)
    }

    #[must_use]
    pub fn inspect_config(&self) -> InspectConfig {
        InspectConfig::default()
            .debounce(self.inspect_debounce)
            .href_suspension(self.href_suspension)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Overlay
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the host needs to draw the tour for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TourOverlay {
    pub kind: TourKind,
    pub index: usize,
    pub total: usize,
    pub title: Option<String>,
    pub content: String,
    pub tooltip: Point,
    pub tooltip_size: Size,
    pub side: Side,
    pub spotlight: Option<Rect>,
    pub target: Option<Rect>,
    pub progress: f64,
    /// A move to another step is waiting for its route.
    pub loading: bool,
}

impl TourOverlay {
    #[must_use]
    pub fn tooltip_rect(&self) -> Rect {
        Rect::from_origin_size(self.tooltip, self.tooltip_size)
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shell
// ─────────────────────────────────────────────────────────────────────────────

pub struct FloatingShell {
    config: ShellConfig,
    persisted: Arc<PersistedState>,
    viewport: Viewport,
    drag: DragController,
    tour: TourController,
    inspect: InspectGate,
    layout: LayoutScheduler,
    decorations: DecorationSet,
    sink: Box<dyn EventSink>,
    tooltip_size: Size,
    closed: bool,
    dock: Option<DockSpec>,
    chat_open: bool,
    highlighted: Option<String>,
    last_target: Option<Rect>,
}

impl FloatingShell {
    /// Build a shell, restoring closed state, anchor position and the
    /// inspection flag from `persisted`.
    #[must_use]
    pub fn new(
        config: ShellConfig,
        viewport: Viewport,
        persisted: Arc<PersistedState>,
        navigator: Box<dyn Navigator>,
        resolver: Box<dyn TargetResolver>,
    ) -> Self {
        let mut drag = DragController::new(config.drag, viewport, Some(Arc::clone(&persisted)));
        let tour = TourController::new(navigator, resolver)
            .with_persistence(Arc::clone(&persisted))
            .with_poll_config(config.poll_config());
        let inspect = InspectGate::from_persisted(config.inspect_config(), &persisted);
        let closed = persisted.closed();
        let dock = closed.then_some(config.default_dock);
        drag.set_pinned(closed);
        tracing::debug!(
            backend = persisted.backend_name(),
            closed,
            inspect = inspect.is_enabled(),
            "floating shell created"
        );
        Self {
            tooltip_size: config.placement.default_tooltip_size,
            config,
            persisted,
            viewport,
            drag,
            tour,
            inspect,
            layout: LayoutScheduler::new(),
            decorations: DecorationSet::new(),
            sink: Box::new(NullSink),
            closed,
            dock,
            chat_open: false,
            highlighted: None,
            last_target: None,
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.tour = self.tour.with_clock(clock);
        self
    }

    /// Emit the events that bring a freshly loaded page in line with the
    /// restored state. Call once after the sink is attached.
    pub fn mount(&mut self) {
        if self.inspect.is_enabled() {
            self.apply_decoration(Decoration::inspect_outline(INSPECT_ANY_SELECTOR));
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────

    #[must_use]
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.dock.is_some()
    }

    #[must_use]
    pub fn is_chat_open(&self) -> bool {
        self.chat_open
    }

    #[must_use]
    pub fn anchor_position(&self) -> AnchorPosition {
        match self.dock {
            Some(dock) => AnchorPosition::Docked(dock),
            None => AnchorPosition::Free(self.drag.position()),
        }
    }

    /// The anchor's box in viewport coordinates.
    #[must_use]
    pub fn anchor_rect(&self) -> Rect {
        let size = self.drag.anchor_size();
        Rect::from_origin_size(
            self.anchor_position().resolve(size, self.viewport),
            Size::square(size),
        )
    }

    #[must_use]
    pub fn tour(&self) -> &TourController {
        &self.tour
    }

    #[must_use]
    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    #[must_use]
    pub fn inspect_gate(&self) -> &InspectGate {
        &self.inspect
    }

    #[must_use]
    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    fn now(&self) -> Duration {
        self.tour.clock().now()
    }

    // ── Open / close / dock ─────────────────────────────────────────────

    /// Leave the closed state: unpinned, free position, chat open.
    pub fn reopen(&mut self) {
        self.persisted.set_closed(false);
        self.closed = false;
        self.dock = None;
        self.drag.set_pinned(false);
        self.drag.restore();
        self.chat_open = true;
        tracing::debug!("widget reopened");
        self.sink.emit(ShellEvent::EnableWidget);
        self.sink.emit(ShellEvent::OpenChat);
    }

    /// Close the widget and dock it at the configured default.
    pub fn close(&mut self) {
        self.persisted.set_closed(true);
        self.closed = true;
        self.chat_open = false;
        self.dock = Some(self.config.default_dock);
        self.drag.set_pinned(true);
        tracing::debug!("widget closed");
    }

    /// Dock at `dock`. Only a closed widget can be pinned, and only to a
    /// dock with at least one edge set; returns false otherwise.
    pub fn pin_at(&mut self, dock: DockSpec) -> bool {
        if !self.closed {
            tracing::debug!(?dock, "pin ignored, widget is open");
            return false;
        }
        if dock.is_empty() {
            tracing::debug!("pin ignored, dock has no edges");
            return false;
        }
        self.dock = Some(dock);
        self.drag.set_pinned(true);
        true
    }

    /// Release the dock and return to the persisted free position.
    pub fn unpin(&mut self) {
        self.dock = None;
        self.drag.set_pinned(false);
        self.drag.restore();
    }

    // ── Anchor input ────────────────────────────────────────────────────

    /// Pointer input on the anchor.
    pub fn on_anchor_pointer(&mut self, event: PointerEvent) -> DragOutcome {
        let now = self.now();
        self.drag.handle_pointer(event, now)
    }

    /// Click on the anchor. Swallowed right after a drag; reopens a closed
    /// widget; otherwise opens the chat. Returns whether it was handled.
    pub fn on_anchor_click(&mut self) -> bool {
        if self.drag.suppresses_click(self.now()) {
            tracing::trace!("anchor click swallowed after drag");
            return false;
        }
        if self.closed {
            self.reopen();
        } else {
            self.chat_open = true;
            self.sink.emit(ShellEvent::OpenChat);
        }
        true
    }

    /// Pointer-down anywhere on the page. Skips the tour when it lands
    /// outside both tooltip and target. Returns whether the tour was skipped.
    pub fn on_page_pointer_down(&mut self, point: Point) -> bool {
        if !self.config.outside_click_skips || !self.tour.is_active() {
            return false;
        }
        let Some(overlay) = self.overlay() else {
            return false;
        };
        if is_outside(point, overlay.tooltip_rect(), overlay.target) {
            tracing::debug!(x = point.x, y = point.y, "outside press, skipping tour");
            self.skip_tour()
        } else {
            false
        }
    }

    // ── Viewport ────────────────────────────────────────────────────────

    pub fn on_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.drag.on_resize(viewport);
        self.layout.invalidate(Invalidation::VIEWPORT_RESIZE);
    }

    pub fn on_scroll(&mut self) {
        self.layout.invalidate(Invalidation::SCROLL);
    }

    /// The host measured the rendered tooltip.
    pub fn set_tooltip_size(&mut self, size: Size) {
        if size != self.tooltip_size {
            self.tooltip_size = size;
            self.layout.invalidate(Invalidation::TOOLTIP_RESIZE);
        }
    }

    // ── Tour surface ────────────────────────────────────────────────────

    pub fn start_tour(&mut self, steps: Vec<TourStep>, initial: usize) -> Transition {
        let t = self.tour.start(steps, initial);
        self.dispatch_tour_events();
        t
    }

    /// Start the guided tour at the persisted step.
    pub fn resume_tour(&mut self, steps: Vec<TourStep>) -> Transition {
        let t = self.tour.resume_guided(steps);
        self.dispatch_tour_events();
        t
    }

    pub fn skip_tour(&mut self) -> bool {
        let skipped = self.tour.skip();
        self.dispatch_tour_events();
        skipped
    }

    pub fn next_step(&mut self, index: usize) -> Transition {
        let t = self.tour.next_from(index);
        self.dispatch_tour_events();
        t
    }

    pub fn prev_step(&mut self, index: usize) -> Transition {
        let t = self.tour.previous_from(index);
        self.dispatch_tour_events();
        t
    }

    pub fn start_contextual(&mut self, step: TourStep) -> Transition {
        let t = self.tour.start_contextual(step);
        self.dispatch_tour_events();
        t
    }

    /// Explain the element annotated with `value`.
    pub fn inspect(&mut self, value: &str) -> Transition {
        let t = self.tour.start_inspect(value);
        self.dispatch_tour_events();
        t
    }

    /// The host navigated away while a step move was pending.
    pub fn cancel_pending(&mut self) -> bool {
        self.tour.cancel_pending()
    }

    // ── Element inspection ──────────────────────────────────────────────

    /// Press on an annotated element. Starts an inspection when the gate
    /// allows it; the host applies the returned decision to the press.
    pub fn on_inspect_press(&mut self, target: &InspectTarget) -> InspectDecision {
        let decision = self.inspect.decide(target, self.now());
        if let InspectDecision::Inspect { value, .. } = &decision {
            self.inspect(value);
        }
        decision
    }

    pub fn set_dynamic_tour_enabled(&mut self, enabled: bool) {
        self.inspect.set_enabled(enabled, Some(self.persisted.as_ref()));
        if enabled {
            self.apply_decoration(Decoration::inspect_outline(INSPECT_ANY_SELECTOR));
        } else {
            self.revert_decoration(INSPECT_ANY_SELECTOR);
        }
    }

    // ── Frame ───────────────────────────────────────────────────────────

    /// Advance pending work and return this frame's overlay.
    pub fn tick(&mut self) -> (Option<TourOverlay>, Vec<String>) {
        if self.tour.is_pending() {
            self.tour.poll();
            self.dispatch_tour_events();
        }
        let restored = self.inspect.take_due_restorations(self.now());
        (self.overlay(), restored)
    }

    /// The tour overlay for the current frame, `None` when no tour runs.
    pub fn overlay(&mut self) -> Option<TourOverlay> {
        let index = self.tour.current_index()?;
        let step = self.tour.current_step()?;
        let total = self.tour.steps().len();
        let placement = step.effective_placement();
        let title = step.title.clone();
        let content = step.content.clone();
        let target = if step.is_centered() {
            None
        } else {
            self.tour.target_rect()
        };

        if target != self.last_target {
            self.last_target = target;
            self.layout.invalidate(Invalidation::SCROLL);
        }
        let config = self.config.placement;
        let (tooltip_size, viewport) = (self.tooltip_size, self.viewport);
        let placed = self
            .layout
            .flush(|| Some(config.place(target, tooltip_size, placement, viewport)))?;

        Some(TourOverlay {
            kind: self.tour.kind(),
            index,
            total,
            title,
            content,
            tooltip: placed.tooltip,
            tooltip_size,
            side: placed.side,
            spotlight: placed.spotlight,
            target,
            progress: progress_percent(index, total),
            loading: self.tour.is_pending(),
        })
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn dispatch_tour_events(&mut self) {
        for event in self.tour.drain_events() {
            match event {
                TourEvent::Started { kind, index, total } => {
                    self.sink.emit(ShellEvent::TourStarted { kind, total });
                    self.enter_step(index);
                }
                TourEvent::StepChanged { from, to, .. } => {
                    let total = self.tour.steps().len();
                    self.sink
                        .emit(ShellEvent::TourStepChanged { from, to, total });
                    self.enter_step(to);
                }
                TourEvent::TargetMissing { index, selector } => {
                    self.sink
                        .emit(ShellEvent::TargetMissing { index, selector });
                }
                TourEvent::Finished { kind, outcome } => {
                    self.clear_highlight();
                    self.layout.clear();
                    self.last_target = None;
                    self.sink.emit(ShellEvent::TourFinished { kind, outcome });
                }
            }
        }
    }

    fn enter_step(&mut self, index: usize) {
        self.layout.step_changed();
        let Some(step) = self.tour.steps().get(index).cloned() else {
            return;
        };

        let highlight = step.target.clone().filter(|_| !step.is_centered());
        let target = self.tour.target_rect();
        if target.is_none()
            && let Some(selector) = &highlight
        {
            let err = BeaconError::TargetNotFound {
                selector: selector.clone(),
            };
            tracing::debug!(
                index,
                error = %err,
                degradation = ?err.degradation(),
                "centering tooltip"
            );
        }
        if highlight != self.highlighted {
            self.clear_highlight();
            if let Some(selector) = &highlight {
                self.apply_decoration(Decoration::step_highlight(selector.clone()));
            }
            self.highlighted = highlight;
        }

        let delta = target.and_then(|target| {
            scroll_into_view_delta(
                target,
                self.tooltip_size.height,
                self.viewport,
                self.config.scroll_margin,
            )
        });
        if let Some(delta) = delta {
            self.sink.emit(ShellEvent::ScrollBy { delta });
            self.layout.invalidate(Invalidation::SCROLL);
        }

        if let Some(action) = step.action {
            self.sink.emit(ShellEvent::StepAction {
                action,
                target: step.target,
            });
        }
    }

    fn clear_highlight(&mut self) {
        if let Some(selector) = self.highlighted.take() {
            self.revert_decoration(&selector);
        }
    }

    fn apply_decoration(&mut self, decoration: Decoration) {
        let (previous, fresh) = self.decorations.apply(decoration.clone());
        if let Some(previous) = previous {
            self.sink.emit(ShellEvent::RevertDecoration(previous));
        }
        if fresh {
            self.sink.emit(ShellEvent::ApplyDecoration(decoration));
        }
    }

    fn revert_decoration(&mut self, selector: &str) {
        if let Some(decoration) = self.decorations.revert(selector) {
            self.sink.emit(ShellEvent::RevertDecoration(decoration));
        }
    }
}

impl fmt::Debug for FloatingShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FloatingShell")
            .field("closed", &self.closed)
            .field("dock", &self.dock)
            .field("anchor", &self.drag.position())
            .field("tour", &self.tour)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_tour::MemoryNavigator;

    fn nothing(_: &str) -> Option<Rect> {
        None
    }

    fn shell(persisted: Arc<PersistedState>) -> (FloatingShell, EventLog) {
        let log = EventLog::new();
        let shell = FloatingShell::new(
            ShellConfig::default(),
            Viewport::new(1280.0, 800.0),
            persisted,
            Box::new(MemoryNavigator::new("/")),
            Box::new(nothing),
        )
        .with_clock(Arc::new(beacon_runtime::clock::ManualClock::new()))
        .with_sink(log.clone());
        (shell, log)
    }

    #[test]
    fn default_config_matches_poll_and_inspect_defaults() {
        let config = ShellConfig::default();
        assert_eq!(config.poll_config(), PollConfig::default());
        assert_eq!(config.inspect_config(), InspectConfig::default());
        assert_eq!(config.default_dock, DockSpec::bottom_right(24.0));
    }

    #[test]
    fn closed_state_restores_docked() {
        let persisted = PersistedState::in_memory().shared();
        persisted.set_closed(true);
        let (shell, _) = shell(persisted);
        assert!(shell.is_closed());
        assert!(shell.is_pinned());
        assert!(shell.anchor_position().is_docked());
    }

    #[test]
    fn pin_requires_closed() {
        let (mut shell, _) = shell(PersistedState::in_memory().shared());
        assert!(!shell.pin_at(DockSpec::default().top(0.0)));
        shell.close();
        assert!(shell.pin_at(DockSpec::default().top(0.0)));
        assert_eq!(
            shell.anchor_position(),
            AnchorPosition::Docked(DockSpec::default().top(0.0))
        );
        shell.unpin();
        assert!(shell.is_closed());
        assert!(!shell.is_pinned());
    }

    #[test]
    fn pin_ignores_empty_dock() {
        let (mut shell, _) = shell(PersistedState::in_memory().shared());
        shell.close();
        assert!(!shell.pin_at(DockSpec::default()));
        assert_eq!(
            shell.anchor_position(),
            AnchorPosition::Docked(ShellConfig::default().default_dock)
        );
    }

    #[test]
    fn reopen_emits_enable_then_open() {
        let (mut shell, log) = shell(PersistedState::in_memory().shared());
        shell.close();
        shell.reopen();
        assert_eq!(log.take(), vec![ShellEvent::EnableWidget, ShellEvent::OpenChat]);
        assert!(shell.is_chat_open());
    }

    #[test]
    fn mount_outlines_inspectable_elements_when_enabled() {
        let persisted = PersistedState::in_memory().shared();
        persisted.set_dynamic_tour(true);
        let (mut shell, log) = shell(persisted);
        shell.mount();
        assert_eq!(
            log.take(),
            vec![ShellEvent::ApplyDecoration(Decoration::inspect_outline(
                INSPECT_ANY_SELECTOR
            ))]
        );
        shell.set_dynamic_tour_enabled(false);
        assert!(matches!(log.take().as_slice(), [ShellEvent::RevertDecoration(_)]));
    }
}
