#![forbid(unsafe_code)]

//! The floating assistant widget.
//!
//! - [`DragController`] - pointer drag of the anchor, clamped to the viewport
//! - [`DockSpec`] / [`AnchorPosition`] - docking while closed
//! - [`Decoration`] - highlight styles handed to the host
//! - [`FloatingShell`] - ties anchor, tour and inspection together

pub mod anchor;
pub mod decoration;
pub mod drag;
pub mod shell;

pub use anchor::{AnchorPosition, AnchorSizing, DockSpec};
pub use decoration::{Decoration, DecorationSet};
pub use drag::{DragConfig, DragController, DragOutcome, DragUpdate, default_position};
pub use shell::{
    EventLog, EventSink, FloatingShell, NullSink, ShellConfig, ShellEvent, TourOverlay,
};
