//! Event handler configuration.

use super::refs::{ActionRef, GuardRef};
use serde::Deserialize;
use std::fmt;

/// One candidate transition for an event: an optional guard, an optional
/// target and an ordered list of actions.
///
/// A descriptor without a target still matches; it fires its actions and
/// leaves the active state where it is.
#[derive(Deserialize)]
#[serde(bound = "")]
pub struct TransitionConfig<C> {
    /// Target state: a sibling key, a full dotted name, an id, or a child key.
    #[serde(default)]
    pub target: Option<String>,

    #[serde(default)]
    pub actions: Vec<ActionRef<C>>,

    /// Absent means the descriptor always applies.
    #[serde(default, alias = "cond")]
    pub guard: Option<GuardRef<C>>,
}

impl<C> TransitionConfig<C> {
    pub fn new() -> Self {
        Self {
            target: None,
            actions: Vec::new(),
            guard: None,
        }
    }

    /// Descriptor that only moves to `target`.
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::new()
        }
    }
}

impl<C> Default for TransitionConfig<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for TransitionConfig<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionConfig")
            .field("target", &self.target)
            .field("actions", &self.actions)
            .field("guard", &self.guard)
            .finish()
    }
}

/// The handler table entry for one event on one state.
///
/// Accepts the three shapes a configuration may use: a bare target name, a
/// single descriptor, or an ordered list of descriptors.
#[derive(Deserialize)]
#[serde(untagged, bound = "")]
pub enum EventConfig<C> {
    Target(String),
    Many(Vec<TransitionConfig<C>>),
    One(TransitionConfig<C>),
}

impl<C> EventConfig<C> {
    /// Normalize into the ordered descriptor list.
    pub fn into_transitions(self) -> Vec<TransitionConfig<C>> {
        match self {
            Self::Target(target) => vec![TransitionConfig::to(target)],
            Self::Many(transitions) => transitions,
            Self::One(transition) => vec![transition],
        }
    }
}

impl<C> From<&str> for EventConfig<C> {
    fn from(target: &str) -> Self {
        Self::Target(target.to_string())
    }
}

impl<C> From<String> for EventConfig<C> {
    fn from(target: String) -> Self {
        Self::Target(target)
    }
}

impl<C> From<TransitionConfig<C>> for EventConfig<C> {
    fn from(transition: TransitionConfig<C>) -> Self {
        Self::One(transition)
    }
}

impl<C> From<Vec<TransitionConfig<C>>> for EventConfig<C> {
    fn from(transitions: Vec<TransitionConfig<C>>) -> Self {
        Self::Many(transitions)
    }
}

impl<C> fmt::Debug for EventConfig<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target(target) => f.debug_tuple("Target").field(target).finish(),
            Self::Many(transitions) => f.debug_tuple("Many").field(transitions).finish(),
            Self::One(transition) => f.debug_tuple("One").field(transition).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_config_normalizes_to_target() {
        let config: EventConfig<()> = serde_json::from_value(json!("loading")).unwrap();
        let transitions = config.into_transitions();

        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].target.as_deref(), Some("loading"));
        assert!(transitions[0].actions.is_empty());
        assert!(transitions[0].guard.is_none());
    }

    #[test]
    fn object_config_normalizes_to_single_descriptor() {
        let config: EventConfig<()> = serde_json::from_value(json!({
            "target": "next",
            "actions": ["a", "b"],
            "guard": "ok"
        }))
        .unwrap();
        let transitions = config.into_transitions();

        assert_eq!(transitions.len(), 1);
        let labels: Vec<_> = transitions[0].actions.iter().map(|a| a.label()).collect();
        assert_eq!(labels, vec!["a", "b"]);
        assert_eq!(transitions[0].guard.as_ref().map(|g| g.label()), Some("ok"));
    }

    #[test]
    fn cond_is_accepted_as_guard() {
        let config: TransitionConfig<()> =
            serde_json::from_value(json!({ "target": "x", "cond": "alwaysTrue" })).unwrap();

        assert_eq!(config.guard.as_ref().map(|g| g.label()), Some("alwaysTrue"));
    }

    #[test]
    fn array_config_preserves_order() {
        let config: EventConfig<()> = serde_json::from_value(json!([
            { "target": "first", "guard": "g1" },
            { "target": "second" },
            { "actions": ["log"] }
        ]))
        .unwrap();
        let targets: Vec<_> = config
            .into_transitions()
            .into_iter()
            .map(|t| t.target)
            .collect();

        assert_eq!(
            targets,
            vec![Some("first".to_string()), Some("second".to_string()), None]
        );
    }

    #[test]
    fn invalid_shape_is_rejected() {
        let result: Result<EventConfig<()>, _> = serde_json::from_value(json!(123));
        assert!(result.is_err());
    }
}
