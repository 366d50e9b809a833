#![forbid(unsafe_code)]

//! Highlight styling as data.
//!
//! The shell never touches page elements. It describes the style it wants on
//! a selector as a [`Decoration`], emits it for the host to apply, and emits
//! the same record again when the style should be reverted.

use std::collections::BTreeMap;

/// A style patch for every element matching `selector`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub selector: String,
    /// CSS property to value, in property order.
    pub patch: BTreeMap<String, String>,
}

impl Decoration {
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            patch: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.patch.insert(property.into(), value.into());
        self
    }

    /// Lift the current step's target above the dimmed backdrop.
    #[must_use]
    pub fn step_highlight(selector: impl Into<String>) -> Self {
        Self::new(selector)
            .style("position", "relative")
            .style("z-index", "9999")
            .style("transition", "box-shadow 0.2s")
    }

    /// Dashed outline marking every inspectable element.
    #[must_use]
    pub fn inspect_outline(selector: impl Into<String>) -> Self {
        Self::new(selector)
            .style("outline", "2px dashed #28a745")
            .style("outline-offset", "2px")
            .style("transition", "outline 0.2s")
    }
}

/// Decorations currently applied, keyed by selector.
#[derive(Debug, Clone, Default)]
pub struct DecorationSet {
    applied: BTreeMap<String, Decoration>,
}

impl DecorationSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `decoration` as applied. Returns a decoration the host must
    /// revert first when one with the same selector but a different patch
    /// was already applied, plus whether the new one needs applying.
    pub fn apply(&mut self, decoration: Decoration) -> (Option<Decoration>, bool) {
        match self.applied.get(&decoration.selector) {
            Some(existing) if *existing == decoration => (None, false),
            _ => {
                let previous = self
                    .applied
                    .insert(decoration.selector.clone(), decoration);
                (previous, true)
            }
        }
    }

    /// Forget the decoration on `selector`, returning it for reverting.
    pub fn revert(&mut self, selector: &str) -> Option<Decoration> {
        self.applied.remove(selector)
    }

    /// Forget everything, returning what must be reverted.
    pub fn revert_all(&mut self) -> Vec<Decoration> {
        std::mem::take(&mut self.applied).into_values().collect()
    }

    #[must_use]
    pub fn is_applied(&self, selector: &str) -> bool {
        self.applied.contains_key(selector)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.applied.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_is_idempotent() {
        let mut set = DecorationSet::new();
        assert_eq!(set.apply(Decoration::step_highlight("#a")), (None, true));
        assert_eq!(set.apply(Decoration::step_highlight("#a")), (None, false));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn changed_patch_replaces() {
        let mut set = DecorationSet::new();
        set.apply(Decoration::new("#a").style("color", "red"));
        let (old, fresh) = set.apply(Decoration::new("#a").style("color", "blue"));
        assert!(fresh);
        assert_eq!(old.map(|d| d.patch["color"].clone()), Some("red".to_owned()));
    }

    #[test]
    fn revert_and_revert_all() {
        let mut set = DecorationSet::new();
        set.apply(Decoration::step_highlight("#a"));
        set.apply(Decoration::inspect_outline("[data-beacon]"));
        assert!(set.revert("#a").is_some());
        assert!(set.revert("#a").is_none());
        let rest = set.revert_all();
        assert_eq!(rest.len(), 1);
        assert!(set.is_empty());
    }
}
