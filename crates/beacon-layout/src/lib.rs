#![forbid(unsafe_code)]

//! Positioning engine for tour tooltips and spotlights.
//!
//! Everything in [`placement`] and [`overlay`] is a pure function of its
//! inputs; [`invalidation`] batches the triggers that call for recomputation.

pub mod invalidation;
pub mod overlay;
pub mod placement;

pub use invalidation::{Invalidation, LayoutScheduler};
pub use overlay::{is_outside, progress_percent, scroll_into_view_delta};
pub use placement::{Placed, Placement, PlacementConfig, Side, is_visible, place, spotlight};
