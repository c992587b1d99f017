//! Builder for event transition descriptors.

use crate::config::{ActionRef, GuardRef, TransitionConfig};
use crate::core::{Action, ActionOutput, Event, Guard};

/// Builder for a single guarded transition descriptor.
///
/// Every part is optional: no target means the actions fire without a state
/// change, no guard means the descriptor always applies.
pub struct TransitionBuilder<C> {
    target: Option<String>,
    guard: Option<GuardRef<C>>,
    actions: Vec<ActionRef<C>>,
}

impl<C> TransitionBuilder<C> {
    pub fn new() -> Self {
        Self {
            target: None,
            guard: None,
            actions: Vec::new(),
        }
    }

    /// Set the target state.
    pub fn to(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Guard by name from the setup's guard table.
    pub fn guard(mut self, name: impl Into<String>) -> Self {
        self.guard = Some(GuardRef::Named(name.into()));
        self
    }

    /// Guard with an inline predicate.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C, &Event) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(GuardRef::Inline(Guard::new("(inline)", predicate)));
        self
    }

    /// Append an action by name from the setup's action table.
    pub fn action(mut self, name: impl Into<String>) -> Self {
        self.actions.push(ActionRef::Named(name.into()));
        self
    }

    /// Append an inline action.
    pub fn run<F, R>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut C, &Event) -> R + Send + Sync + 'static,
        R: Into<ActionOutput>,
    {
        self.actions.push(ActionRef::Inline(Action::new(name, func)));
        self
    }

    pub fn build(self) -> TransitionConfig<C> {
        TransitionConfig {
            target: self.target,
            actions: self.actions,
            guard: self.guard,
        }
    }
}

impl<C> Default for TransitionBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> From<TransitionBuilder<C>> for crate::config::EventConfig<C> {
    fn from(builder: TransitionBuilder<C>) -> Self {
        Self::One(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder_has_no_parts() {
        let transition = TransitionBuilder::<()>::new().build();

        assert!(transition.target.is_none());
        assert!(transition.guard.is_none());
        assert!(transition.actions.is_empty());
    }

    #[test]
    fn fluent_api_builds_descriptor() {
        let transition = TransitionBuilder::<u8>::new()
            .to("loading")
            .guard("canFetch")
            .action("log")
            .run("count", |n: &mut u8, _: &Event| *n += 1)
            .build();

        assert_eq!(transition.target.as_deref(), Some("loading"));
        assert_eq!(transition.guard.as_ref().map(|g| g.label()), Some("canFetch"));
        let labels: Vec<_> = transition.actions.iter().map(|a| a.label()).collect();
        assert_eq!(labels, vec!["log", "count"]);
    }

    #[test]
    fn inline_guard_replaces_named_guard() {
        let transition = TransitionBuilder::<u8>::new()
            .guard("named")
            .when(|n: &u8, _: &Event| *n > 3)
            .build();

        match transition.guard {
            Some(GuardRef::Inline(guard)) => assert!(guard.check(&4, &Event::named("E"))),
            other => panic!("expected inline guard, got {other:?}"),
        }
    }
}
