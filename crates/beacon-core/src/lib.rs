#![forbid(unsafe_code)]

//! Core: viewport geometry, pointer input, and the error taxonomy.

pub mod error;
pub mod event;
pub mod geometry;

pub use error::{BeaconError, DegradationAction};
pub use event::{PointerEvent, PointerPhase, PointerSource};
pub use geometry::{Point, Rect, Size, Viewport, clamp_axis, clamp_point};
