#![forbid(unsafe_code)]

//! Geometric primitives in viewport pixels.
//!
//! All coordinates are `f64` CSS pixels relative to the top-left corner of the
//! visible viewport. Everything here is pure: no state, no I/O.

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise offset.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Vector from `other` to `self` as `(dx, dy)`.
    #[inline]
    pub fn delta_from(self, other: Point) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Square of side `side`.
    #[inline]
    pub const fn square(side: f64) -> Self {
        Self::new(side, side)
    }

    /// True if either dimension is zero or negative.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle, typically an element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at `origin` with the given size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Right edge (`x + width`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Center point of the rectangle.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True if the rectangle has no positive area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point lies inside the rectangle (edges inclusive).
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// True if `other` lies entirely within `self`.
    #[inline]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// True if the two rectangles overlap with positive area.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection_opt(other).is_some()
    }

    /// Compute the intersection with another rectangle, returning `None` if
    /// there is no overlap.
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Grow the rectangle by `outset` on every side.
    #[must_use]
    pub fn inflate(&self, outset: f64) -> Rect {
        Rect::new(
            self.x - outset,
            self.y - outset,
            self.width + outset * 2.0,
            self.height + outset * 2.0,
        )
    }
}

/// The visible area of the hosting page.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The viewport as a rectangle anchored at the origin.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// The viewport rectangle shrunk by `margin` on all sides.
    #[inline]
    pub fn inset(&self, margin: f64) -> Rect {
        Rect::new(
            margin,
            margin,
            (self.width - margin * 2.0).max(0.0),
            (self.height - margin * 2.0).max(0.0),
        )
    }

    /// True if a box of `size` fits inside the viewport with `margin` on every side.
    #[inline]
    pub fn fits(&self, size: Size, margin: f64) -> bool {
        size.width + margin * 2.0 <= self.width && size.height + margin * 2.0 <= self.height
    }
}

/// Clamp a coordinate on one axis: `clamp(v, margin, extent - size - margin)`.
///
/// When the viewport is too small for `size` plus both margins the range is
/// inverted; the lower bound (`margin`) wins so the leading edge stays visible.
#[inline]
pub fn clamp_axis(value: f64, margin: f64, extent: f64, size: f64) -> f64 {
    let hi = extent - size - margin;
    if hi < margin {
        return margin;
    }
    value.clamp(margin, hi)
}

/// Clamp a top-left corner so a box of `size` stays inside `viewport` minus `margin`.
#[inline]
pub fn clamp_point(point: Point, size: Size, viewport: Viewport, margin: f64) -> Point {
    Point::new(
        clamp_axis(point.x, margin, viewport.width, size.width),
        clamp_axis(point.y, margin, viewport.height, size.height),
    )
}
