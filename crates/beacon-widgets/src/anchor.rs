#![forbid(unsafe_code)]

//! Where the anchor sits: free (dragged) or docked to viewport edges.

use beacon_core::geometry::{Point, Viewport};
use serde::{Deserialize, Serialize};

/// Partial edge offsets supplied by the hosting page.
///
/// `left` wins over `right` and `top` over `bottom`; an axis with neither is
/// centered.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DockSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
}

impl DockSpec {
    /// Bottom-right corner, `offset` pixels in from both edges.
    #[must_use]
    pub const fn bottom_right(offset: f64) -> Self {
        Self {
            top: None,
            left: None,
            right: Some(offset),
            bottom: Some(offset),
        }
    }

    #[must_use]
    pub fn top(mut self, v: f64) -> Self {
        self.top = Some(v);
        self
    }

    #[must_use]
    pub fn left(mut self, v: f64) -> Self {
        self.left = Some(v);
        self
    }

    #[must_use]
    pub fn right(mut self, v: f64) -> Self {
        self.right = Some(v);
        self
    }

    #[must_use]
    pub fn bottom(mut self, v: f64) -> Self {
        self.bottom = Some(v);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.left.is_none() && self.right.is_none() && self.bottom.is_none()
    }

    /// Top-left corner of an anchor of side `size` docked in `viewport`.
    #[must_use]
    pub fn resolve(&self, size: f64, viewport: Viewport) -> Point {
        let x = self
            .left
            .or_else(|| self.right.map(|r| viewport.width - r - size))
            .unwrap_or((viewport.width - size) / 2.0);
        let y = self
            .top
            .or_else(|| self.bottom.map(|b| viewport.height - b - size))
            .unwrap_or((viewport.height - size) / 2.0);
        Point::new(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorPosition {
    /// Owned by the drag controller.
    Free(Point),
    /// Owned by the host while pinned.
    Docked(DockSpec),
}

impl AnchorPosition {
    #[must_use]
    pub fn resolve(&self, size: f64, viewport: Viewport) -> Point {
        match self {
            Self::Free(p) => *p,
            Self::Docked(dock) => dock.resolve(size, viewport),
        }
    }

    #[must_use]
    pub fn is_docked(&self) -> bool {
        matches!(self, Self::Docked(_))
    }
}

/// Responsive anchor size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorSizing {
    pub compact: f64,
    /// Used at or below `breakpoint`, where fingers are the likely pointer.
    pub touch: f64,
    pub breakpoint: f64,
}

impl Default for AnchorSizing {
    fn default() -> Self {
        Self {
            compact: 54.0,
            touch: 64.0,
            breakpoint: 768.0,
        }
    }
}

impl AnchorSizing {
    #[must_use]
    pub fn size_for(&self, viewport: Viewport) -> f64 {
        if viewport.width <= self.breakpoint {
            self.touch
        } else {
            self.compact
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport::new(1280.0, 800.0);

    #[test]
    fn bottom_right_dock() {
        let p = DockSpec::bottom_right(24.0).resolve(54.0, VP);
        assert_eq!(p, Point::new(1280.0 - 24.0 - 54.0, 800.0 - 24.0 - 54.0));
    }

    #[test]
    fn left_and_top_take_precedence() {
        let dock = DockSpec::default().left(10.0).right(99.0).top(5.0).bottom(99.0);
        assert_eq!(dock.resolve(54.0, VP), Point::new(10.0, 5.0));
    }

    #[test]
    fn unset_axis_is_centered() {
        let p = DockSpec::default().top(0.0).resolve(50.0, VP);
        assert_eq!(p, Point::new(615.0, 0.0));
        assert!(DockSpec::default().is_empty());
    }

    #[test]
    fn sizing_breakpoint_is_inclusive() {
        let s = AnchorSizing::default();
        assert_eq!(s.size_for(Viewport::new(768.0, 1024.0)), 64.0);
        assert_eq!(s.size_for(Viewport::new(769.0, 1024.0)), 54.0);
    }

    #[test]
    fn free_position_resolves_to_itself() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(AnchorPosition::Free(p).resolve(54.0, VP), p);
        assert!(AnchorPosition::Docked(DockSpec::default()).is_docked());
    }
}
