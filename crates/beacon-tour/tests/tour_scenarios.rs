//! End-to-end tour scenarios against an in-memory router, a scripted
//! resolver, and a manual clock.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;

use beacon_core::geometry::Rect;
use beacon_runtime::clock::{Clock, ManualClock};
use beacon_runtime::state_persistence::PersistedState;
use beacon_tour::{
    MemoryNavigator, Navigator, PollConfig, Resolution, TargetResolver, TourAdvanceReason,
    TourController, TourEvent, TourKind, TourOutcome, TourState, TourStep, Transition,
    await_resolve,
};
use pretty_assertions::assert_eq;
use web_time::Duration;

// ── Harness ─────────────────────────────────────────────────────────────

#[derive(Clone)]
struct SharedNavigator(Rc<RefCell<MemoryNavigator>>);

impl Navigator for SharedNavigator {
    fn current_route(&self) -> String {
        self.0.borrow().current_route()
    }
    fn navigate(&mut self, route: &str) {
        self.0.borrow_mut().navigate(route);
    }
}

/// Resolver whose set of present selectors the test edits mid-tour.
#[derive(Clone, Default)]
struct Page(Rc<RefCell<HashSet<String>>>);

impl Page {
    fn with(selectors: &[&str]) -> Self {
        let page = Self::default();
        for s in selectors {
            page.show(s);
        }
        page
    }

    fn show(&self, selector: &str) {
        self.0.borrow_mut().insert(selector.to_owned());
    }
}

impl TargetResolver for Page {
    fn resolve(&self, selector: &str) -> Option<Rect> {
        self.0
            .borrow()
            .contains(selector)
            .then(|| Rect::new(100.0, 100.0, 80.0, 30.0))
    }
}

struct Harness {
    ctl: TourController,
    nav: Rc<RefCell<MemoryNavigator>>,
    page: Page,
    clock: Arc<ManualClock>,
    persisted: Arc<PersistedState>,
}

fn harness(route: &str, page: Page) -> Harness {
    let nav = Rc::new(RefCell::new(MemoryNavigator::new(route)));
    let clock = Arc::new(ManualClock::new());
    let persisted = PersistedState::in_memory().shared();
    let ctl = TourController::new(
        Box::new(SharedNavigator(Rc::clone(&nav))),
        Box::new(page.clone()),
    )
    .with_clock(clock.clone())
    .with_persistence(Arc::clone(&persisted));
    Harness {
        ctl,
        nav,
        page,
        clock,
        persisted,
    }
}

// ── Scenario A: linear tour, no routes ──────────────────────────────────

#[test]
fn linear_tour_runs_to_completion() {
    let mut h = harness("/home", Page::with(&["#a", "#b", "#c"]));
    let steps = vec![
        TourStep::new("#a", "A"),
        TourStep::new("#b", "B"),
        TourStep::new("#c", "C"),
    ];
    assert!(h.ctl.start(steps, 0).is_committed());
    assert_eq!(h.persisted.guided_step(), Some(0));

    assert_eq!(h.ctl.next(), Transition::Committed(TourState::Active { index: 1 }));
    assert_eq!(h.persisted.guided_step(), Some(1));
    assert_eq!(h.ctl.next(), Transition::Committed(TourState::Active { index: 2 }));
    assert_eq!(h.ctl.next(), Transition::Committed(TourState::Idle));

    assert_eq!(h.persisted.guided_step(), None);
    assert!(!h.persisted.tour_skipped());
    assert_eq!(
        h.ctl.drain_events(),
        vec![
            TourEvent::Started {
                kind: TourKind::Guided,
                index: 0,
                total: 3
            },
            TourEvent::StepChanged {
                from: 0,
                to: 1,
                reason: TourAdvanceReason::Next
            },
            TourEvent::StepChanged {
                from: 1,
                to: 2,
                reason: TourAdvanceReason::Next
            },
            TourEvent::Finished {
                kind: TourKind::Guided,
                outcome: TourOutcome::Completed
            },
        ]
    );
    assert!(h.nav.borrow().history().is_empty());
}

// ── Scenario B: cross-route step ────────────────────────────────────────

#[test]
fn navigates_before_committing_routed_step() {
    let mut h = harness("/home", Page::with(&["#welcome"]));
    let steps = vec![
        TourStep::new("#welcome", "Hi").route("/home"),
        TourStep::new("#project-list", "Projects").route("/projects"),
    ];
    h.ctl.start(steps, 0);
    h.ctl.drain_events();

    let t = h.ctl.next();
    assert!(matches!(t, Transition::Pending { ref route, .. } if route == "/projects"));
    assert_eq!(h.nav.borrow().history(), ["/projects".to_owned()]);
    assert_eq!(h.ctl.current_index(), Some(0));

    // The new view renders its list a few frames later.
    h.clock.advance(Duration::from_millis(100));
    assert!(matches!(h.ctl.poll(), Transition::Pending { .. }));
    h.page.show("#project-list");
    h.clock.advance(Duration::from_millis(100));
    assert_eq!(h.ctl.poll(), Transition::Committed(TourState::Active { index: 1 }));

    assert_eq!(
        h.ctl.drain_events(),
        vec![TourEvent::StepChanged {
            from: 0,
            to: 1,
            reason: TourAdvanceReason::Next
        }]
    );
    assert!(h.ctl.target_rect().is_some());
}

#[test]
fn same_route_as_leaving_step_does_not_navigate() {
    let mut h = harness("/home", Page::with(&["#a", "#b"]));
    h.nav.borrow_mut().set_current("/elsewhere");
    let steps = vec![
        TourStep::new("#a", "A").route("/docs"),
        TourStep::new("#b", "B").route("/docs"),
    ];
    // Starting navigates to /docs; moving between two /docs steps does not.
    h.ctl.start(steps, 0);
    h.nav.borrow_mut().set_current("/docs/intro");
    assert!(h.ctl.next().is_committed());
    assert_eq!(h.nav.borrow().history(), ["/docs".to_owned()]);
}

#[test]
fn previous_navigates_back() {
    let mut h = harness("/home", Page::with(&["#a", "#b"]));
    let steps = vec![
        TourStep::new("#a", "A").route("/home"),
        TourStep::new("#b", "B").route("/projects"),
    ];
    h.ctl.start(steps, 0);
    assert!(h.ctl.next().is_committed());
    assert_eq!(
        h.ctl.previous(),
        Transition::Committed(TourState::Active { index: 0 })
    );
    assert_eq!(
        h.nav.borrow().history(),
        ["/projects".to_owned(), "/home".to_owned()]
    );
}

// ── Scenario C: unresolvable target ─────────────────────────────────────

#[test]
fn unresolvable_target_times_out_near_two_seconds() {
    let clock = ManualClock::new();
    let page = Page::default();
    let config = PollConfig::default();
    let out = await_resolve(&page, "#never", config, &clock, None);
    assert_eq!(out, Resolution::NotFound);
    let elapsed = clock.now();
    assert!(elapsed >= config.timeout.saturating_sub(config.interval));
    assert!(elapsed <= config.timeout + config.interval);
}

#[test]
fn timed_out_step_is_shown_without_target() {
    let mut h = harness("/home", Page::default());
    h.ctl
        .start(vec![TourStep::new("#ghost", "Boo").route("/haunted")], 0);
    assert_eq!(h.ctl.settle(), Transition::Committed(TourState::Active { index: 0 }));
    assert_eq!(h.ctl.target_rect(), None);
    assert!(h.ctl.drain_events().contains(&TourEvent::TargetMissing {
        index: 0,
        selector: "#ghost".into()
    }));
}

#[test]
fn timeout_is_logged_as_warning() {
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Captured(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;
        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(captured.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        let mut h = harness("/home", Page::default());
        h.ctl
            .start(vec![TourStep::new("#ghost", "Boo").route("/haunted")], 0);
        h.ctl.settle();
    });

    let bytes = captured.0.lock().expect("log buffer").clone();
    let text = String::from_utf8(bytes).expect("utf-8 logs");
    assert!(text.contains("WARN"), "{text}");
    assert!(text.contains("navigation to /haunted timed out after 2000ms"), "{text}");
    assert!(text.contains("#ghost"), "{text}");
}

// ── Skip and cancellation ───────────────────────────────────────────────

#[test]
fn skip_during_poll_discards_result() {
    let mut h = harness("/home", Page::default());
    let steps = vec![
        TourStep::new("#a", "A"),
        TourStep::new("#late", "Late").route("/slow"),
    ];
    h.page.show("#a");
    h.ctl.start(steps, 0);
    assert!(matches!(h.ctl.next(), Transition::Pending { .. }));

    assert!(h.ctl.skip());
    h.page.show("#late");
    h.clock.advance(Duration::from_millis(500));
    assert_eq!(h.ctl.poll(), Transition::Ignored);
    assert_eq!(h.ctl.state(), TourState::Idle);
    assert!(h.persisted.tour_skipped());
    assert_eq!(h.persisted.guided_step(), None);

    let events = h.ctl.drain_events();
    assert_eq!(
        events.last(),
        Some(&TourEvent::Finished {
            kind: TourKind::Guided,
            outcome: TourOutcome::Skipped
        })
    );
    assert!(!events
        .iter()
        .any(|e| matches!(e, TourEvent::StepChanged { to: 1, .. })));
}

#[test]
fn contextual_tour_does_not_touch_persistence() {
    let mut h = harness("/home", Page::default());
    h.ctl.start_contextual(TourStep::narration("Tip"));
    assert_eq!(h.ctl.kind(), TourKind::Contextual);
    assert!(h.ctl.skip());
    assert!(!h.persisted.tour_skipped());
    assert_eq!(h.persisted.guided_step(), None);
}

#[test]
fn skipping_guided_tour_behind_pending_contextual_clears_persistence() {
    let mut h = harness("/home", Page::with(&["#a", "#b"]));
    let steps = vec![TourStep::new("#a", "A"), TourStep::new("#b", "B")];
    assert!(h.ctl.start(steps, 1).is_committed());
    assert_eq!(h.persisted.guided_step(), Some(1));

    assert!(matches!(
        h.ctl
            .start_contextual(TourStep::new("#x", "X").route("/other")),
        Transition::Pending { .. }
    ));
    assert!(h.ctl.skip());

    assert_eq!(h.ctl.state(), TourState::Idle);
    assert_eq!(h.persisted.guided_step(), None);
    assert!(h.persisted.tour_skipped());
    assert_eq!(
        h.ctl.drain_events(),
        vec![
            TourEvent::Started {
                kind: TourKind::Guided,
                index: 1,
                total: 2,
            },
            TourEvent::Finished {
                kind: TourKind::Guided,
                outcome: TourOutcome::Skipped,
            },
        ]
    );
}

#[test]
fn skipping_contextual_behind_pending_guided_start_records_skip() {
    let mut h = harness("/home", Page::default());
    h.ctl.start_contextual(TourStep::narration("Tip"));
    assert!(matches!(
        h.ctl
            .start(vec![TourStep::new("#late", "Late").route("/slow")], 0),
        Transition::Pending { .. }
    ));
    assert!(h.ctl.skip());
    assert!(h.persisted.tour_skipped());
    assert_eq!(h.persisted.guided_step(), None);
}

// ── Scenario E: skip-suppressed flag ────────────────────────────────────

#[test]
fn explicit_start_ignores_skip_flag() {
    let mut h = harness("/home", Page::default());
    h.persisted.set_tour_skipped(true);
    assert!(!h.ctl.should_offer_tour());
    assert!(h.ctl.start(vec![TourStep::narration("Again")], 0).is_committed());
    assert!(h.ctl.is_active());
}

// ── Resume ──────────────────────────────────────────────────────────────

#[test]
fn resume_uses_persisted_index_in_range() {
    let mut h = harness("/home", Page::default());
    let steps = || {
        vec![
            TourStep::narration("1"),
            TourStep::narration("2"),
            TourStep::narration("3"),
        ]
    };
    h.persisted.set_guided_step(2);
    h.ctl.resume_guided(steps());
    assert_eq!(h.ctl.current_index(), Some(2));

    h.ctl.skip();
    h.persisted.set_guided_step(7);
    h.ctl.resume_guided(steps());
    assert_eq!(h.ctl.current_index(), Some(0));
}
