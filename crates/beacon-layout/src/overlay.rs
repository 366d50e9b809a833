#![forbid(unsafe_code)]

//! Overlay helpers: scroll-into-view, outside-click hit testing, progress.

use beacon_core::geometry::{Point, Rect, Viewport};

/// Margin kept between the viewport edge and target or card when scrolling.
pub const SCROLL_MARGIN: f64 = 16.0;

/// Vertical scroll adjustment that brings the target and its card into view.
///
/// Returns `None` when no scroll is needed. A positive delta scrolls the page
/// down (content moves up).
///
/// The card goes below the target when there is room, otherwise above;
/// failing both, the card is centered on the target and nudged to clear it.
#[must_use]
pub fn scroll_into_view_delta(
    target: Rect,
    tooltip_height: f64,
    viewport: Viewport,
    margin: f64,
) -> Option<f64> {
    let vh = viewport.height;
    let space_above = target.top() - margin;
    let space_below = vh - target.bottom() - margin;
    let needed = tooltip_height + margin;

    if space_below >= needed {
        // Room below; only scroll if the target itself sits above the fold.
        return (target.bottom() < margin).then(|| target.bottom() - margin);
    }
    if space_above >= needed {
        return (target.top() > vh - margin).then(|| target.top() - (vh - margin));
    }

    let mut desired = target.center().y - tooltip_height / 2.0;
    if desired < target.bottom() + margin && desired + tooltip_height > target.top() - margin {
        if target.bottom() + tooltip_height + margin < vh {
            desired = target.bottom() + margin;
        } else if target.top() - tooltip_height - margin > 0.0 {
            desired = target.top() - tooltip_height - margin;
        }
    }
    Some(desired - margin)
}

/// True if a pointer-down at `point` lands outside both the tooltip and the
/// target. Without a resolved target there is nothing to click "outside" of,
/// so this returns `false`.
#[must_use]
pub fn is_outside(point: Point, tooltip: Rect, target: Option<Rect>) -> bool {
    match target {
        Some(target) => !tooltip.contains(point) && !target.contains(point),
        None => false,
    }
}

/// Completion percentage for step `index` of `total`, with `index` clamped.
#[must_use]
pub fn progress_percent(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let clamped = index.min(total - 1);
    (clamped + 1) as f64 / total as f64 * 100.0
}
