#![forbid(unsafe_code)]

//! Tooltip placement around a tour target.
//!
//! # Invariants
//!
//! 1. Whenever the tooltip fits inside the viewport minus `margin`, the placed
//!    tooltip rectangle lies entirely within it, whatever side was chosen.
//! 2. [`place`] is pure: identical inputs produce identical output.
//! 3. The spotlight is present only for a visible target (positive area and
//!    overlapping the viewport); a hidden target never suppresses the tooltip.
//!
//! # Fallback Order
//!
//! requested side → opposite side → whichever of above/below has more room
//! (if feasible) → centered vertically on the target, nudged to clear it.
//!
//! # Example
//!
//! ```
//! use beacon_core::geometry::{Rect, Size, Viewport};
//! use beacon_layout::placement::{Placement, Side, place};
//!
//! let target = Rect::new(100.0, 100.0, 80.0, 30.0);
//! let placed = place(Some(target), Size::new(200.0, 100.0), Placement::Bottom,
//!     Viewport::new(1024.0, 768.0), 20.0);
//! assert_eq!(placed.side, Side::Bottom);
//! assert_eq!(placed.tooltip.y, 150.0);
//! ```

use beacon_core::geometry::{Point, Rect, Size, Viewport, clamp_point};

/// Default gap between target and tooltip, in pixels.
pub const DEFAULT_MARGIN: f64 = 20.0;

/// Default spotlight outset around the target, in pixels.
pub const DEFAULT_SPOTLIGHT_OUTSET: f64 = 8.0;

/// Assumed tooltip size before the host reports a measured one.
pub const DEFAULT_TOOLTIP_SIZE: Size = Size::new(320.0, 200.0);

/// Requested tooltip placement relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Placement {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
    /// Center of the viewport; never spotlights.
    Center,
}

impl Placement {
    /// The opposite side. `Center` maps to itself.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Center => Self::Center,
        }
    }
}

/// Where the tooltip actually ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
    /// No side was feasible; centered vertically on the target.
    AlongTarget,
    /// Centered in the viewport (no target, or `Placement::Center`).
    Viewport,
}

/// Output of [`place`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placed {
    /// Top-left corner of the tooltip.
    pub tooltip: Point,
    pub side: Side,
    /// Highlight rectangle around the target, if it is visible.
    pub spotlight: Option<Rect>,
}

impl Placed {
    /// Tooltip bounds for hit testing.
    #[must_use]
    pub fn tooltip_rect(&self, size: Size) -> Rect {
        Rect::from_origin_size(self.tooltip, size)
    }
}

/// Placement tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct PlacementConfig {
    pub margin: f64,
    pub spotlight_outset: f64,
    /// Size used until the rendered tooltip has been measured.
    pub default_tooltip_size: Size,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            spotlight_outset: DEFAULT_SPOTLIGHT_OUTSET,
            default_tooltip_size: DEFAULT_TOOLTIP_SIZE,
        }
    }
}

impl PlacementConfig {
    #[must_use]
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn spotlight_outset(mut self, outset: f64) -> Self {
        self.spotlight_outset = outset;
        self
    }

    #[must_use]
    pub fn default_tooltip_size(mut self, size: Size) -> Self {
        self.default_tooltip_size = size;
        self
    }

    /// Run [`place_with_outset`] with this configuration.
    #[must_use]
    pub fn place(
        &self,
        target: Option<Rect>,
        tooltip: Size,
        placement: Placement,
        viewport: Viewport,
    ) -> Placed {
        place_with_outset(
            target,
            tooltip,
            placement,
            viewport,
            self.margin,
            self.spotlight_outset,
        )
    }
}

/// Compute tooltip coordinates and the spotlight for a target.
///
/// Uses [`DEFAULT_SPOTLIGHT_OUTSET`] for the spotlight.
#[must_use]
pub fn place(
    target: Option<Rect>,
    tooltip: Size,
    placement: Placement,
    viewport: Viewport,
    margin: f64,
) -> Placed {
    place_with_outset(
        target,
        tooltip,
        placement,
        viewport,
        margin,
        DEFAULT_SPOTLIGHT_OUTSET,
    )
}

/// [`place`] with an explicit spotlight outset.
#[must_use]
pub fn place_with_outset(
    target: Option<Rect>,
    tooltip: Size,
    placement: Placement,
    viewport: Viewport,
    margin: f64,
    outset: f64,
) -> Placed {
    let target = match target {
        Some(t) if placement != Placement::Center => t,
        _ => {
            return Placed {
                tooltip: centered_in(viewport, tooltip, margin),
                side: Side::Viewport,
                spotlight: None,
            };
        }
    };

    let (w, h) = (tooltip.width, tooltip.height);
    let (vw, vh) = (viewport.width, viewport.height);

    // Feasibility: target edge + margin + tooltip extent stays within the
    // viewport minus margin.
    let fits = |side: Placement| -> bool {
        match side {
            Placement::Bottom => target.bottom() + margin + h <= vh - margin,
            Placement::Top => target.top() - margin - h >= margin,
            Placement::Right => target.right() + margin + w <= vw - margin,
            Placement::Left => target.left() - margin - w >= margin,
            Placement::Center => false,
        }
    };

    let chosen = [placement, placement.flip()]
        .into_iter()
        .find(|&side| fits(side))
        .or_else(|| {
            let room_above = target.top();
            let room_below = vh - target.bottom();
            let roomier = if room_below >= room_above {
                Placement::Bottom
            } else {
                Placement::Top
            };
            fits(roomier).then_some(roomier)
        });

    let center = target.center();
    let (raw, side) = match chosen {
        Some(Placement::Bottom) => (
            Point::new(center.x - w / 2.0, target.bottom() + margin),
            Side::Bottom,
        ),
        Some(Placement::Top) => (
            Point::new(center.x - w / 2.0, target.top() - margin - h),
            Side::Top,
        ),
        Some(Placement::Right) => (
            Point::new(target.right() + margin, center.y - h / 2.0),
            Side::Right,
        ),
        Some(Placement::Left) => (
            Point::new(target.left() - margin - w, center.y - h / 2.0),
            Side::Left,
        ),
        Some(Placement::Center) | None => (
            Point::new(center.x - w / 2.0, along_target_y(target, h, vh, margin)),
            Side::AlongTarget,
        ),
    };

    Placed {
        tooltip: clamp_point(raw, tooltip, viewport, margin),
        side,
        spotlight: spotlight(target, viewport, outset),
    }
}

/// Vertical position when no side fits: centered on the target, shifted to
/// just clear it when the centered card would cover it.
fn along_target_y(target: Rect, h: f64, vh: f64, margin: f64) -> f64 {
    let desired = target.center().y - h / 2.0;
    let overlaps = desired < target.bottom() + margin && desired + h > target.top() - margin;
    if !overlaps {
        return desired;
    }
    if target.bottom() + margin + h < vh {
        target.bottom() + margin
    } else if target.top() - margin - h > 0.0 {
        target.top() - margin - h
    } else {
        desired
    }
}

fn centered_in(viewport: Viewport, tooltip: Size, margin: f64) -> Point {
    let raw = Point::new(
        (viewport.width - tooltip.width) / 2.0,
        (viewport.height - tooltip.height) / 2.0,
    );
    clamp_point(raw, tooltip, viewport, margin)
}

/// True if the target has positive area and overlaps the viewport.
#[must_use]
pub fn is_visible(target: Rect, viewport: Viewport) -> bool {
    !target.is_empty()
        && target.bottom() > 0.0
        && target.right() > 0.0
        && target.top() < viewport.height
        && target.left() < viewport.width
}

/// Spotlight rectangle for a visible target, inflated by `outset`.
#[must_use]
pub fn spotlight(target: Rect, viewport: Viewport, outset: f64) -> Option<Rect> {
    is_visible(target, viewport).then(|| target.inflate(outset))
}
