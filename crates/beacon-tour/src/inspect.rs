#![forbid(unsafe_code)]

//! Element inspection ("dynamic tour").
//!
//! While inspection is enabled, pressing on an element annotated with
//! `data-beacon="value"` opens a one-step tour explaining that element
//! instead of performing the element's own action. [`InspectGate`] makes the
//! per-press decision; the host applies it (prevents the default action,
//! suspends and later restores a link's `href`).

use beacon_runtime::state_persistence::PersistedState;
use web_time::Duration;

use crate::step::TourStep;

/// Attribute marking inspectable elements.
pub const INSPECT_ATTRIBUTE: &str = "data-beacon";

/// Selector matching every inspectable element, for highlighting.
pub const INSPECT_ANY_SELECTOR: &str = "[data-beacon]";

/// Selector for the element annotated with `value`.
#[must_use]
pub fn inspect_selector(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("[{INSPECT_ATTRIBUTE}=\"{escaped}\"]")
}

/// The single step shown when inspecting `value`.
#[must_use]
pub fn inspect_step(value: &str) -> TourStep {
    TourStep::new(inspect_selector(value), format!("Details for: {value}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectConfig {
    /// Presses on the same value closer than this are ignored.
    pub debounce: Duration,
    /// How long a pressed link stays without its `href`.
    pub href_suspension: Duration,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(2000),
            href_suspension: Duration::from_millis(2000),
        }
    }
}

impl InspectConfig {
    #[must_use]
    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    #[must_use]
    pub fn href_suspension(mut self, suspension: Duration) -> Self {
        self.href_suspension = suspension;
        self
    }
}

/// What kind of element was pressed, as far as default actions go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementRole {
    #[default]
    Generic,
    /// `<button type="submit">` or `<input type="submit">`.
    Submit,
    /// `<a href>` opening in the same window.
    Link,
    /// `<a href target=...>`; handled like a plain element, `href` kept.
    ExternalLink,
}

impl ElementRole {
    /// Roles whose default action leaves the page and must be intercepted.
    #[must_use]
    pub const fn intercepts(self) -> bool {
        matches!(self, Self::Submit | Self::Link)
    }
}

/// The pressed element, as described by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectTarget {
    pub value: String,
    pub disabled: bool,
    pub role: ElementRole,
}

impl InspectTarget {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            disabled: false,
            role: ElementRole::Generic,
        }
    }

    #[must_use]
    pub fn role(mut self, role: ElementRole) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    InspectionOff,
    Disabled,
    EmptyValue,
    Debounced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectDecision {
    /// Let the press through untouched.
    Ignore(IgnoreReason),
    /// Start an inspection of `value` and prevent the element's default
    /// action. For same-window links, `restore_href_at` is when the host
    /// should put the suspended `href` back.
    Inspect {
        value: String,
        restore_href_at: Option<Duration>,
    },
}

/// Per-press policy for element inspection.
#[derive(Debug, Clone)]
pub struct InspectGate {
    config: InspectConfig,
    enabled: bool,
    last: Option<(String, Duration)>,
    suspended: Vec<(String, Duration)>,
}

impl InspectGate {
    #[must_use]
    pub fn new(config: InspectConfig, enabled: bool) -> Self {
        Self {
            config,
            enabled,
            last: None,
            suspended: Vec::new(),
        }
    }

    /// Gate with the enabled flag read once from persisted state.
    #[must_use]
    pub fn from_persisted(config: InspectConfig, persisted: &PersistedState) -> Self {
        Self::new(config, persisted.dynamic_tour())
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn inspection on or off, persisting the choice when a store is given.
    pub fn set_enabled(&mut self, enabled: bool, persisted: Option<&PersistedState>) {
        if self.enabled != enabled {
            tracing::debug!(enabled, "element inspection toggled");
        }
        self.enabled = enabled;
        if !enabled {
            self.last = None;
        }
        if let Some(persisted) = persisted {
            persisted.set_dynamic_tour(enabled);
        }
    }

    /// Decide what a press on `target` at `now` should do.
    pub fn decide(&mut self, target: &InspectTarget, now: Duration) -> InspectDecision {
        if !self.enabled {
            return InspectDecision::Ignore(IgnoreReason::InspectionOff);
        }
        if target.disabled {
            return InspectDecision::Ignore(IgnoreReason::Disabled);
        }
        let value = target.value.trim();
        if value.is_empty() {
            return InspectDecision::Ignore(IgnoreReason::EmptyValue);
        }

        let repeated = self.last.as_ref().is_some_and(|(last, at)| {
            last == value && now.saturating_sub(*at) <= self.config.debounce
        });
        if repeated {
            // A repeated press on a plain element re-arms, so the next one
            // inspects again.
            if !target.role.intercepts() {
                self.last = None;
            }
            return InspectDecision::Ignore(IgnoreReason::Debounced);
        }

        self.last = Some((value.to_owned(), now));
        let restore_href_at = (target.role == ElementRole::Link).then(|| {
            let at = now.saturating_add(self.config.href_suspension);
            self.suspended.push((value.to_owned(), at));
            at
        });
        InspectDecision::Inspect {
            value: value.to_owned(),
            restore_href_at,
        }
    }

    /// Values whose link `href` is due for restoration at `now`.
    pub fn take_due_restorations(&mut self, now: Duration) -> Vec<String> {
        let (due, pending): (Vec<_>, Vec<_>) =
            self.suspended.drain(..).partition(|(_, at)| *at <= now);
        self.suspended = pending;
        due.into_iter().map(|(value, _)| value).collect()
    }

    /// Links currently waiting for their `href` back.
    #[must_use]
    pub fn suspended_count(&self) -> usize {
        self.suspended.len()
    }
}

impl Default for InspectGate {
    fn default() -> Self {
        Self::new(InspectConfig::default(), false)
    }
}
