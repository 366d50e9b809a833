#![forbid(unsafe_code)]

//! Pointer input normalised across mouse and touch.
//!
//! Hosts translate their native mouse and single-finger touch events into a
//! [`PointerEvent`]. Multi-touch gestures are not modelled; hosts should
//! report only the first touch point.

use crate::geometry::Point;

/// Where a pointer event originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerSource {
    /// Mouse or pen.
    Mouse,
    /// First finger of a touch sequence.
    Touch,
}

impl PointerSource {
    /// Touch moves scroll the page unless the host prevents the default action.
    #[must_use]
    pub const fn scrolls_page(self) -> bool {
        matches!(self, Self::Touch)
    }
}

/// Phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// Button pressed or finger placed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released or finger lifted.
    Up,
    /// The platform aborted the sequence (e.g. `touchcancel`).
    Cancel,
}

/// A single pointer event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub source: PointerSource,
    pub phase: PointerPhase,
    pub position: Point,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(source: PointerSource, phase: PointerPhase, position: Point) -> Self {
        Self {
            source,
            phase,
            position,
        }
    }

    /// Mouse event shorthand.
    #[must_use]
    pub const fn mouse(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self::new(PointerSource::Mouse, phase, Point::new(x, y))
    }

    /// Touch event shorthand.
    #[must_use]
    pub const fn touch(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self::new(PointerSource::Touch, phase, Point::new(x, y))
    }

    /// True for `Up` and `Cancel`.
    #[must_use]
    pub const fn is_release(&self) -> bool {
        matches!(self.phase, PointerPhase::Up | PointerPhase::Cancel)
    }
}
