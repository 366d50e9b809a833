//! Facade smoke tests: loading documents, error conversion, and a short tour
//! driven entirely through the prelude.

use std::sync::Arc;

use beacon::prelude::*;
use beacon::{BeaconError, ManualClock, StorageError, load_config, load_steps};
use pretty_assertions::assert_eq;

#[test]
fn steps_load_from_json() {
    let steps = load_steps(
        r##"[
            {"target": "#inbox", "content": "Messages", "placement": "top", "action": "simulate-click"},
            {"content": "That's all", "route": "/done"}
        ]"##,
    )
    .expect("valid steps");
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].placement, Some(Placement::Top));
    assert_eq!(steps[0].action, Some(StepAction::Click));
    assert!(steps[1].is_centered());
    assert_eq!(steps[1].route.as_deref(), Some("/done"));
}

#[test]
fn malformed_documents_are_parse_errors() {
    let err = load_steps("[{").expect_err("truncated");
    assert!(matches!(err, Error::Parse(_)));
    assert!(err.to_string().starts_with("parse: "));

    assert!(matches!(
        load_config(r#"{"poll_timeout": "soon"}"#),
        Err(Error::Parse(_))
    ));
    assert_eq!(load_config("{}").expect("empty is default"), ShellConfig::default());
}

#[test]
fn errors_convert_into_facade_error() {
    let err: Error = BeaconError::InvalidStepIndex { index: 9, len: 3 }.into();
    assert_eq!(err.to_string(), "step index 9 out of range for 3 steps");
    assert!(std::error::Error::source(&err).is_some());

    let err: Error = StorageError::Unavailable("quota".to_owned()).into();
    assert!(matches!(err, Error::Storage(StorageError::Unavailable(_))));
    assert!(err.to_string().starts_with("storage: "));
}

#[test]
fn prelude_runs_a_tour() {
    fn resolve(selector: &str) -> Option<Rect> {
        (selector == "#inbox").then_some(Rect::new(40.0, 40.0, 120.0, 32.0))
    }

    let persisted = PersistedState::in_memory().shared();
    let mut shell = FloatingShell::new(
        ShellConfig::default(),
        Viewport::new(1024.0, 768.0),
        Arc::clone(&persisted),
        Box::new(MemoryNavigator::new("/")),
        Box::new(resolve),
    )
    .with_clock(Arc::new(ManualClock::new()));

    let steps = vec![
        TourStep::new("#inbox", "Messages"),
        TourStep::narration("Done"),
    ];
    assert!(shell.start_tour(steps, 0).is_committed());
    assert_eq!(persisted.guided_step(), Some(0));
    assert!(shell.overlay().is_some_and(|o| o.spotlight.is_some()));

    assert!(shell.next_step(0).is_committed());
    assert!(shell.overlay().is_some_and(|o| o.target.is_none()));

    assert!(shell.next_step(1).is_committed());
    assert!(shell.overlay().is_none());
    assert_eq!(persisted.guided_step(), None);
    assert!(!persisted.tour_skipped());
}

#[test]
fn env_filter_falls_back_to_default() {
    // The variable is not set under the test runner.
    if std::env::var_os(beacon::logging::ENV_VAR).is_none() {
        assert_eq!(
            beacon::logging::env_filter().to_string(),
            beacon::logging::DEFAULT_DIRECTIVES
        );
    }
}
