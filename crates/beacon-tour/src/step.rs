#![forbid(unsafe_code)]

//! Tour steps and their JSON form.

use std::fmt;

use beacon_layout::placement::Placement;
use serde::{Deserialize, Serialize};

/// Side effect the shell performs once a step becomes active.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StepAction {
    /// Simulate a click on the step's target.
    Click,
    /// Open the conversational panel.
    OpenChat,
    /// Host-defined tag, passed through untouched.
    Custom(String),
}

impl StepAction {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::OpenChat => "open-chat",
            Self::Custom(tag) => tag,
        }
    }
}

impl From<String> for StepAction {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "click" | "simulate-click" => Self::Click,
            "open-chat" | "open-panel" => Self::OpenChat,
            _ => Self::Custom(tag),
        }
    }
}

impl From<&str> for StepAction {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_owned())
    }
}

impl From<StepAction> for String {
    fn from(action: StepAction) -> Self {
        match action {
            StepAction::Custom(tag) => tag,
            other => other.as_str().to_owned(),
        }
    }
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a tour.
///
/// A step without a target is a narration step and renders as a centered
/// card, as does any step with [`Placement::Center`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TourStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<StepAction>,
}

impl TourStep {
    /// A step pointing at `target`.
    #[must_use]
    pub fn new(target: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            content: content.into(),
            ..Self::default()
        }
    }

    /// A centered step with no target.
    #[must_use]
    pub fn narration(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }

    #[must_use]
    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    #[must_use]
    pub fn action(mut self, action: impl Into<StepAction>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Requested placement, `Bottom` when unset.
    #[must_use]
    pub fn effective_placement(&self) -> Placement {
        self.placement.unwrap_or_default()
    }

    /// True when the step renders as a centered card without a spotlight.
    #[must_use]
    pub fn is_centered(&self) -> bool {
        self.target.is_none() || self.placement == Some(Placement::Center)
    }
}

/// Parse a JSON array of steps.
///
/// ```
/// let steps = beacon_tour::step::steps_from_json(
///     r##"[{"target": "#search", "content": "Search here", "placement": "top"}]"##,
/// ).unwrap();
/// assert_eq!(steps[0].target.as_deref(), Some("#search"));
/// ```
pub fn steps_from_json(json: &str) -> Result<Vec<TourStep>, serde_json::Error> {
    serde_json::from_str(json)
}
