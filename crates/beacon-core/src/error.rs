#![forbid(unsafe_code)]

//! Tour and overlay error taxonomy with graceful degradation.
//!
//! The overlay is never on the primary application path, so none of these
//! errors is fatal. Each variant maps to a [`DegradationAction`] describing
//! how the feature keeps working in a reduced form.
//!
//! | Error | Cause | Degradation |
//! |-------|-------|-------------|
//! | `TargetNotFound` | Selector matched nothing before the deadline | Centered tooltip, no spotlight |
//! | `NavigationTimeout` | Route change did not produce the target in time | Proceed to the step without a target |
//! | `PersistenceUnavailable` | Key-value store unreadable or unwritable | In-memory state only |
//! | `InvalidStepIndex` | Index outside the step list | Clamp into range |

use core::fmt;
use core::time::Duration;

/// Errors observed while running a tour or positioning the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeaconError {
    /// The selector matched no element within the polling window.
    TargetNotFound { selector: String },
    /// Navigation was requested but the step's target never appeared.
    NavigationTimeout { route: String, waited: Duration },
    /// The persistent key-value store cannot be used.
    PersistenceUnavailable(String),
    /// A step index outside `0..len` was supplied.
    InvalidStepIndex { index: usize, len: usize },
}

/// What the overlay does instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradationAction {
    /// Render a centered card without a spotlight.
    CenterTooltip,
    /// Commit the step anyway and render it without a target.
    ProceedWithoutTarget,
    /// Keep state in memory; it resets on the next load.
    InMemoryOnly,
    /// Clamp the index into `[0, len - 1]`.
    ClampIndex,
}

impl BeaconError {
    /// Determine the degradation for this error.
    #[must_use]
    pub fn degradation(&self) -> DegradationAction {
        match self {
            Self::TargetNotFound { .. } => DegradationAction::CenterTooltip,
            Self::NavigationTimeout { .. } => DegradationAction::ProceedWithoutTarget,
            Self::PersistenceUnavailable(_) => DegradationAction::InMemoryOnly,
            Self::InvalidStepIndex { .. } => DegradationAction::ClampIndex,
        }
    }

    /// Error type label for tracing fields.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::TargetNotFound { .. } => "target_not_found",
            Self::NavigationTimeout { .. } => "navigation_timeout",
            Self::PersistenceUnavailable(_) => "persistence_unavailable",
            Self::InvalidStepIndex { .. } => "invalid_step_index",
        }
    }

    /// Every overlay error is recoverable.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        true
    }
}

impl fmt::Display for BeaconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetNotFound { selector } => write!(f, "target not found: {selector}"),
            Self::NavigationTimeout { route, waited } => write!(
                f,
                "navigation to {route} timed out after {}ms",
                waited.as_millis()
            ),
            Self::PersistenceUnavailable(reason) => {
                write!(f, "persistence unavailable: {reason}")
            }
            Self::InvalidStepIndex { index, len } => {
                write!(f, "step index {index} out of range for {len} steps")
            }
        }
    }
}

impl std::error::Error for BeaconError {}

/// Clamp `index` into `[0, len - 1]`, reporting the original as an error when
/// it was out of range. Returns `(0, None)` for an empty list.
#[must_use]
pub fn clamp_step_index(index: usize, len: usize) -> (usize, Option<BeaconError>) {
    if len == 0 {
        return (0, None);
    }
    if index < len {
        (index, None)
    } else {
        (len - 1, Some(BeaconError::InvalidStepIndex { index, len }))
    }
}
