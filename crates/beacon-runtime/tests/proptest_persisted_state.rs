//! Property tests for persisted state.
//!
//! Any sequence of typed writes reads back as the latest value per key,
//! whether the backend is healthy, unavailable from the start, or fails
//! partway through the session.

use std::sync::atomic::{AtomicUsize, Ordering};

use beacon_core::geometry::Point;
use beacon_runtime::state_persistence::{
    KeyValueStore, MemoryStore, PersistedState, StorageError, StorageResult, UnavailableStore,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Closed(bool),
    Position(f64, f64),
    Skipped(bool),
    Guided(Option<usize>),
    Dynamic(bool),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(Op::Closed),
        (-1.0e6f64..1.0e6, -1.0e6f64..1.0e6).prop_map(|(x, y)| Op::Position(x, y)),
        any::<bool>().prop_map(Op::Skipped),
        prop::option::of(0usize..64).prop_map(Op::Guided),
        any::<bool>().prop_map(Op::Dynamic),
        Just(Op::Clear),
    ]
}

/// What the state should report after a sequence of ops.
#[derive(Debug, Default, PartialEq)]
struct Model {
    closed: bool,
    position: Option<Point>,
    skipped: bool,
    guided: Option<usize>,
    dynamic: bool,
}

impl Model {
    fn apply(&mut self, op: &Op) {
        match *op {
            Op::Closed(on) => self.closed = on,
            Op::Position(x, y) => self.position = Some(Point::new(x, y)),
            Op::Skipped(on) => self.skipped = on,
            Op::Guided(index) => self.guided = index,
            Op::Dynamic(on) => self.dynamic = on,
            Op::Clear => *self = Self::default(),
        }
    }

    fn observe(state: &PersistedState) -> Self {
        Self {
            closed: state.closed(),
            position: state.position(),
            skipped: state.tour_skipped(),
            guided: state.guided_step(),
            dynamic: state.dynamic_tour(),
        }
    }
}

fn apply(state: &PersistedState, op: &Op) {
    match *op {
        Op::Closed(on) => state.set_closed(on),
        Op::Position(x, y) => state.set_position(Point::new(x, y)),
        Op::Skipped(on) => state.set_tour_skipped(on),
        Op::Guided(Some(index)) => state.set_guided_step(index),
        Op::Guided(None) => state.clear_guided_step(),
        Op::Dynamic(on) => state.set_dynamic_tour(on),
        Op::Clear => state.clear(),
    }
}

/// Backend that works for a number of calls, then fails every call after.
struct FailsAfter {
    inner: MemoryStore,
    remaining: AtomicUsize,
}

impl FailsAfter {
    fn new(calls: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            remaining: AtomicUsize::new(calls),
        }
    }

    fn spend(&self) -> StorageResult<()> {
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .map(drop)
            .map_err(|_| StorageError::Unavailable("quota exceeded".to_owned()))
    }
}

impl KeyValueStore for FailsAfter {
    fn name(&self) -> &str {
        "FailsAfter"
    }
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.spend()?;
        self.inner.get(key)
    }
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.spend()?;
        self.inner.set(key, value)
    }
    fn remove(&self, key: &str) -> StorageResult<()> {
        self.spend()?;
        self.inner.remove(key)
    }
}

fn check(state: &PersistedState, ops: &[Op]) -> Result<(), TestCaseError> {
    let mut model = Model::default();
    for op in ops {
        apply(state, op);
        model.apply(op);
        prop_assert_eq!(&Model::observe(state), &model, "after {:?}", op);
    }
    Ok(())
}

proptest! {
    #[test]
    fn healthy_backend_reads_latest_writes(ops in prop::collection::vec(op(), 1..40)) {
        let state = PersistedState::in_memory();
        check(&state, &ops)?;
        prop_assert!(!state.is_degraded());
    }

    #[test]
    fn unavailable_backend_reads_latest_writes(ops in prop::collection::vec(op(), 1..40)) {
        let state = PersistedState::new(Box::new(UnavailableStore::new("blocked")));
        check(&state, &ops)?;
        prop_assert!(state.is_degraded());
    }

    #[test]
    fn mid_session_failure_keeps_latest_writes(
        ops in prop::collection::vec(op(), 1..40),
        budget in 0usize..60,
    ) {
        let state = PersistedState::new(Box::new(FailsAfter::new(budget)));
        check(&state, &ops)?;
    }
}
