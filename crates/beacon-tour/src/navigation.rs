#![forbid(unsafe_code)]

//! The tour's only hook into host routing.

/// Host router as seen by the tour.
///
/// `navigate` only requests a route change; the tour then polls for the
/// step's target rather than trusting the change to be synchronous.
pub trait Navigator {
    /// Identifier of the view currently shown (a path, usually).
    fn current_route(&self) -> String;

    fn navigate(&mut self, route: &str);
}

/// Whether moving to a step on `next_route` needs a route change.
///
/// Navigation is skipped when the step has no route, when the host already
/// shows it, or when the step being left declared the same route (the host
/// may have redirected and the tour should not fight it).
#[must_use]
pub fn needs_navigation(
    next_route: Option<&str>,
    current_view: &str,
    leaving_route: Option<&str>,
) -> Option<String> {
    let route = next_route?;
    if route == current_view || Some(route) == leaving_route {
        return None;
    }
    Some(route.to_owned())
}

/// In-memory router for headless hosts and tests.
///
/// With `immediate` set (the default) a navigation takes effect at once;
/// otherwise it is queued until [`MemoryNavigator::complete`].
#[derive(Debug, Clone)]
pub struct MemoryNavigator {
    current: String,
    queued: Option<String>,
    history: Vec<String>,
    immediate: bool,
}

impl MemoryNavigator {
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: initial.into(),
            queued: None,
            history: Vec::new(),
            immediate: true,
        }
    }

    /// Queue navigations instead of applying them.
    #[must_use]
    pub fn deferred(mut self) -> Self {
        self.immediate = false;
        self
    }

    /// Every route requested, in order.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Apply a queued navigation. Returns the new route.
    pub fn complete(&mut self) -> Option<&str> {
        let route = self.queued.take()?;
        self.current = route;
        Some(&self.current)
    }

    /// Simulate the user navigating on their own.
    pub fn set_current(&mut self, route: impl Into<String>) {
        self.current = route.into();
    }
}

impl Navigator for MemoryNavigator {
    fn current_route(&self) -> String {
        self.current.clone()
    }

    fn navigate(&mut self, route: &str) {
        self.history.push(route.to_owned());
        if self.immediate {
            self.current = route.to_owned();
        } else {
            self.queued = Some(route.to_owned());
        }
    }
}
