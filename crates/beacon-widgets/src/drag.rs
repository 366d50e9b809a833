#![forbid(unsafe_code)]

//! Anchor drag physics.
//!
//! Mouse and single-finger touch drive the same session: the pointer's delta
//! from where it went down is added to where the anchor was, and the result is
//! clamped to the viewport minus a margin. The final position is persisted on
//! release unless the anchor is pinned.
//!
//! Releasing a drag starts a short cooldown during which a click on the anchor
//! is swallowed, so a drag never doubles as a click.

use std::sync::Arc;

use beacon_core::event::{PointerEvent, PointerPhase, PointerSource};
use beacon_core::geometry::{Point, Size, Viewport, clamp_point};
use beacon_runtime::state_persistence::PersistedState;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::anchor::AnchorSizing;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    pub margin: f64,
    #[serde(with = "millis")]
    pub click_cooldown: Duration,
    pub sizing: AnchorSizing,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            margin: 8.0,
            click_cooldown: Duration::from_millis(100),
            sizing: AnchorSizing::default(),
        }
    }
}

impl DragConfig {
    #[must_use]
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn click_cooldown(mut self, cooldown: Duration) -> Self {
        self.click_cooldown = cooldown;
        self
    }

    #[must_use]
    pub fn sizing(mut self, sizing: AnchorSizing) -> Self {
        self.sizing = sizing;
        self
    }
}

/// Durations as integer milliseconds in config files.
pub(crate) mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use web_time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// New anchor position produced by a pointer move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    pub position: Point,
    /// The host must prevent the move's default action (page scroll).
    pub prevent_default: bool,
}

/// What a pointer event did to the drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    Ignored,
    Started,
    Moved(DragUpdate),
    /// Released; carries the position written to storage, if any.
    Dropped(Option<Point>),
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    source: PointerSource,
    pointer_origin: Point,
    element_origin: Point,
}

#[derive(Debug)]
pub struct DragController {
    config: DragConfig,
    viewport: Viewport,
    position: Point,
    pinned: bool,
    session: Option<DragSession>,
    cooldown_until: Option<Duration>,
    persisted: Option<Arc<PersistedState>>,
}

impl DragController {
    /// Create a controller and restore the persisted position.
    #[must_use]
    pub fn new(
        config: DragConfig,
        viewport: Viewport,
        persisted: Option<Arc<PersistedState>>,
    ) -> Self {
        let mut ctl = Self {
            config,
            viewport,
            position: default_position(viewport),
            pinned: false,
            session: None,
            cooldown_until: None,
            persisted,
        };
        ctl.restore();
        ctl
    }

    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Side length of the anchor at the current viewport width.
    #[must_use]
    pub fn anchor_size(&self) -> f64 {
        self.config.sizing.size_for(self.viewport)
    }

    /// Pinning aborts any drag in progress.
    pub fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
        if pinned && self.session.is_some() {
            self.cancel_drag();
        }
    }

    /// Reload the persisted position, clamped to the current viewport; the
    /// default position when nothing is stored.
    pub fn restore(&mut self) {
        let stored = self.persisted.as_ref().and_then(|p| p.position());
        self.position = self.clamp(stored.unwrap_or_else(|| default_position(self.viewport)));
    }

    /// Begin a drag. No-op (returns false) while pinned.
    pub fn begin_drag(
        &mut self,
        pointer_origin: Point,
        element_origin: Point,
        source: PointerSource,
    ) -> bool {
        if self.pinned {
            tracing::trace!("drag ignored while pinned");
            return false;
        }
        self.session = Some(DragSession {
            source,
            pointer_origin,
            element_origin,
        });
        true
    }

    pub fn on_move(&mut self, pointer: Point) -> Option<DragUpdate> {
        let session = self.session?;
        let (dx, dy) = pointer.delta_from(session.pointer_origin);
        self.position = self.clamp(session.element_origin.offset(dx, dy));
        Some(DragUpdate {
            position: self.position,
            prevent_default: session.source.scrolls_page(),
        })
    }

    /// Finish the drag, persisting the position unless pinned.
    pub fn end_drag(&mut self, now: Duration) -> Option<Point> {
        self.session.take()?;
        self.cooldown_until = Some(now.saturating_add(self.config.click_cooldown));
        if self.pinned {
            return None;
        }
        if let Some(persisted) = &self.persisted {
            persisted.set_position(self.position);
        }
        tracing::debug!(x = self.position.x, y = self.position.y, "anchor dropped");
        Some(self.position)
    }

    /// Abort the drag and put the anchor back where it started.
    pub fn cancel_drag(&mut self) {
        if let Some(session) = self.session.take() {
            self.position = session.element_origin;
        }
    }

    /// True while a click at `now` should be swallowed.
    #[must_use]
    pub fn suppresses_click(&self, now: Duration) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    /// Re-clamp to a new viewport. The free position is left alone while pinned.
    pub fn on_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if !self.pinned {
            self.position = self.clamp(self.position);
        }
    }

    /// Route one pointer event on the anchor.
    pub fn handle_pointer(&mut self, event: PointerEvent, now: Duration) -> DragOutcome {
        match event.phase {
            PointerPhase::Down => {
                if self.begin_drag(event.position, self.position, event.source) {
                    DragOutcome::Started
                } else {
                    DragOutcome::Ignored
                }
            }
            PointerPhase::Move => self
                .on_move(event.position)
                .map_or(DragOutcome::Ignored, DragOutcome::Moved),
            PointerPhase::Up if self.is_dragging() => DragOutcome::Dropped(self.end_drag(now)),
            PointerPhase::Cancel if self.is_dragging() => {
                self.cancel_drag();
                DragOutcome::Cancelled
            }
            PointerPhase::Up | PointerPhase::Cancel => DragOutcome::Ignored,
        }
    }

    fn clamp(&self, p: Point) -> Point {
        clamp_point(
            p,
            Size::square(self.anchor_size()),
            self.viewport,
            self.config.margin,
        )
    }
}

/// Where a never-dragged anchor starts: a third of the way in on each axis.
#[must_use]
pub fn default_position(viewport: Viewport) -> Point {
    Point::new(viewport.width / 3.0 - 32.0, viewport.height / 3.0 - 32.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport::new(1280.0, 800.0);

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn ctl() -> DragController {
        DragController::new(DragConfig::default(), VP, None)
    }

    #[test]
    fn starts_at_default_position() {
        let c = ctl();
        assert_eq!(c.position(), Point::new(1280.0 / 3.0 - 32.0, 800.0 / 3.0 - 32.0));
    }

    #[test]
    fn drag_tracks_pointer_delta() {
        let mut c = ctl();
        let origin = c.position();
        assert!(c.begin_drag(Point::new(500.0, 500.0), origin, PointerSource::Mouse));
        let up = c.on_move(Point::new(520.0, 490.0)).unwrap();
        assert_eq!(up.position, origin.offset(20.0, -10.0));
        assert!(!up.prevent_default);
    }

    #[test]
    fn drag_is_clamped() {
        let mut c = ctl();
        c.begin_drag(Point::new(0.0, 0.0), c.position(), PointerSource::Mouse);
        let up = c.on_move(Point::new(-5000.0, 5000.0)).unwrap();
        assert_eq!(up.position, Point::new(8.0, 800.0 - 54.0 - 8.0));
    }

    #[test]
    fn touch_moves_prevent_scroll() {
        let mut c = ctl();
        c.begin_drag(Point::new(10.0, 10.0), c.position(), PointerSource::Touch);
        assert!(c.on_move(Point::new(11.0, 11.0)).unwrap().prevent_default);
    }

    #[test]
    fn pinned_drag_is_noop() {
        let mut c = ctl();
        c.set_pinned(true);
        let before = c.position();
        assert!(!c.begin_drag(Point::new(0.0, 0.0), before, PointerSource::Mouse));
        assert_eq!(c.on_move(Point::new(100.0, 100.0)), None);
        assert_eq!(c.end_drag(ms(0)), None);
        assert_eq!(c.position(), before);
    }

    #[test]
    fn end_drag_persists_and_starts_cooldown() {
        let persisted = PersistedState::in_memory().shared();
        let mut c = DragController::new(DragConfig::default(), VP, Some(persisted.clone()));
        c.begin_drag(Point::new(0.0, 0.0), Point::new(100.0, 100.0), PointerSource::Mouse);
        c.on_move(Point::new(50.0, 25.0));
        assert_eq!(c.end_drag(ms(1000)), Some(Point::new(150.0, 125.0)));
        assert_eq!(persisted.position(), Some(Point::new(150.0, 125.0)));
        assert!(c.suppresses_click(ms(1050)));
        assert!(!c.suppresses_click(ms(1100)));
    }

    #[test]
    fn cancel_restores_origin_without_persisting() {
        let persisted = PersistedState::in_memory().shared();
        let mut c = DragController::new(DragConfig::default(), VP, Some(persisted.clone()));
        let origin = c.position();
        c.begin_drag(Point::new(0.0, 0.0), origin, PointerSource::Touch);
        c.on_move(Point::new(40.0, 40.0));
        c.cancel_drag();
        assert_eq!(c.position(), origin);
        assert_eq!(persisted.position(), None);
    }

    #[test]
    fn restore_clamps_stale_position() {
        let persisted = PersistedState::in_memory().shared();
        persisted.set_position(Point::new(5000.0, -20.0));
        let c = DragController::new(DragConfig::default(), VP, Some(persisted));
        assert_eq!(c.position(), Point::new(1280.0 - 54.0 - 8.0, 8.0));
    }

    #[test]
    fn resize_reclamps_unless_pinned() {
        let mut c = ctl();
        c.begin_drag(Point::new(0.0, 0.0), Point::new(1000.0, 600.0), PointerSource::Mouse);
        c.on_move(Point::new(0.0, 0.0));
        c.end_drag(ms(0));

        c.set_pinned(true);
        c.on_resize(Viewport::new(400.0, 400.0));
        assert_eq!(c.position(), Point::new(1000.0, 600.0));

        c.set_pinned(false);
        c.on_resize(Viewport::new(400.0, 400.0));
        // 400 wide is under the breakpoint: 64 px anchor.
        assert_eq!(c.position(), Point::new(400.0 - 64.0 - 8.0, 400.0 - 64.0 - 8.0));
    }

    #[test]
    fn pointer_routing() {
        let mut c = ctl();
        let start = c.position();
        assert_eq!(
            c.handle_pointer(PointerEvent::mouse(PointerPhase::Down, 10.0, 10.0), ms(0)),
            DragOutcome::Started
        );
        assert!(matches!(
            c.handle_pointer(PointerEvent::mouse(PointerPhase::Move, 30.0, 10.0), ms(5)),
            DragOutcome::Moved(_)
        ));
        assert_eq!(
            c.handle_pointer(PointerEvent::mouse(PointerPhase::Up, 30.0, 10.0), ms(10)),
            DragOutcome::Dropped(Some(start.offset(20.0, 0.0)))
        );
        assert_eq!(
            c.handle_pointer(PointerEvent::mouse(PointerPhase::Up, 30.0, 10.0), ms(20)),
            DragOutcome::Ignored
        );
    }

    #[test]
    fn config_reads_millis() {
        let cfg: DragConfig = serde_json::from_str(r#"{"margin": 12, "click_cooldown": 250}"#).unwrap();
        assert_eq!(cfg.margin, 12.0);
        assert_eq!(cfg.click_cooldown, ms(250));
        assert_eq!(cfg.sizing, AnchorSizing::default());
    }
}
