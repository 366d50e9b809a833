#![forbid(unsafe_code)]

//! Guided tours: steps, target polling, and the tour state machine.
//!
//! # Key Components
//!
//! - [`TourController`] - `Idle` / `Active` state machine spanning route changes
//! - [`ResolvePoll`] / [`await_resolve`] - bounded polling for a step's target
//! - [`Navigator`] - the single hook into host routing
//! - [`InspectGate`] - press policy for element inspection

pub mod controller;
pub mod inspect;
pub mod navigation;
pub mod resolver;
pub mod step;

pub use controller::{
    TourAdvanceReason, TourController, TourEvent, TourKind, TourOutcome, TourState, Transition,
};
pub use inspect::{
    ElementRole, IgnoreReason, InspectConfig, InspectDecision, InspectGate, InspectTarget,
    inspect_selector, inspect_step,
};
pub use navigation::{MemoryNavigator, Navigator};
pub use resolver::{PollConfig, PollState, ResolvePoll, Resolution, TargetResolver, await_resolve};
pub use step::{StepAction, TourStep, steps_from_json};
