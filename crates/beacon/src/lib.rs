#![forbid(unsafe_code)]

//! Beacon public facade.
//!
//! Re-exports the types a host needs to run guided tours around a floating
//! assistant anchor, a unified [`Error`], a [`prelude`], and a logging
//! bootstrap in [`logging`].
//!
//! ```no_run
//! use beacon::prelude::*;
//! use std::sync::Arc;
//!
//! # fn resolve(_: &str) -> Option<Rect> { None }
//! let persisted = PersistedState::in_memory().shared();
//! let mut shell = FloatingShell::new(
//!     ShellConfig::default(),
//!     Viewport::new(1280.0, 800.0),
//!     Arc::clone(&persisted),
//!     Box::new(MemoryNavigator::new("/")),
//!     Box::new(resolve),
//! );
//! shell.start_tour(vec![TourStep::new("#inbox", "Your messages land here")], 0);
//! ```

use std::fmt;

pub mod logging;

// --- Core re-exports -------------------------------------------------------

pub use beacon_core::error::{BeaconError, DegradationAction};
pub use beacon_core::event::{PointerEvent, PointerPhase, PointerSource};
pub use beacon_core::geometry::{Point, Rect, Size, Viewport};

// --- Layout re-exports -----------------------------------------------------

pub use beacon_layout::placement::{Placed, Placement, PlacementConfig, Side};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "state-persistence")]
pub use beacon_runtime::FileStore;
pub use beacon_runtime::{
    CancellationSource, CancellationToken, Clock, KeyValueStore, ManualClock, MemoryStore,
    PersistedKey, PersistedState, StorageError, SystemClock, UnavailableStore,
};

// --- Tour re-exports -------------------------------------------------------

pub use beacon_tour::{
    ElementRole, InspectConfig, InspectDecision, InspectGate, InspectTarget, MemoryNavigator,
    Navigator, PollConfig, Resolution, StepAction, TargetResolver, TourController, TourEvent,
    TourKind, TourOutcome, TourState, TourStep, Transition,
};

// --- Widget re-exports -----------------------------------------------------

pub use beacon_widgets::{
    AnchorPosition, Decoration, DockSpec, DragConfig, DragController, DragOutcome, EventLog,
    EventSink, FloatingShell, ShellConfig, ShellEvent, TourOverlay,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Beacon hosts.
#[derive(Debug)]
pub enum Error {
    /// A recoverable tour or layout condition.
    Beacon(BeaconError),
    /// The key-value store failed.
    Storage(StorageError),
    /// A step list or config document could not be parsed.
    Parse(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beacon(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "storage: {err}"),
            Self::Parse(err) => write!(f, "parse: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Beacon(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<BeaconError> for Error {
    fn from(err: BeaconError) -> Self {
        Self::Beacon(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// Standard result type for Beacon APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Parse a JSON step list.
pub fn load_steps(json: &str) -> Result<Vec<TourStep>> {
    Ok(beacon_tour::steps_from_json(json)?)
}

/// Parse a JSON shell configuration; missing fields take their defaults.
pub fn load_config(json: &str) -> Result<ShellConfig> {
    Ok(serde_json::from_str(json)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AnchorPosition, DockSpec, Error, EventSink, FloatingShell, MemoryNavigator, Navigator,
        PersistedState, Placement, Point, PointerEvent, PointerPhase, Rect, Result, ShellConfig,
        ShellEvent, Size, StepAction, TargetResolver, TourKind, TourStep, Transition, Viewport,
    };

    pub use crate::{core, layout, runtime, tour, widgets};
}

pub use beacon_core as core;
pub use beacon_layout as layout;
pub use beacon_runtime as runtime;
pub use beacon_tour as tour;
pub use beacon_widgets as widgets;
