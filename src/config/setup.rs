//! Action and guard tables a configuration refers to by name.

use crate::core::{Action, ActionOutput, Event, Guard};
use std::collections::HashMap;
use std::fmt;

/// Name-keyed action and guard tables supplied by the caller.
///
/// The engine only reads from a setup. Names are resolved once, when the
/// machine is built.
///
/// # Example
///
/// ```rust
/// use hsmkit::config::Setup;
/// use hsmkit::core::Event;
///
/// let setup: Setup<u32> = Setup::new()
///     .action("increment", |n: &mut u32, _: &Event| *n += 1)
///     .guard("belowTen", |n: &u32, _: &Event| *n < 10);
///
/// assert!(setup.find_action("increment").is_some());
/// assert!(setup.find_guard("belowTen").is_some());
/// assert!(setup.find_action("missing").is_none());
/// ```
pub struct Setup<C> {
    actions: HashMap<String, Action<C>>,
    guards: HashMap<String, Guard<C>>,
}

impl<C> Setup<C> {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            guards: HashMap::new(),
        }
    }

    /// Register an action under `name`.
    pub fn action<F, R>(self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut C, &Event) -> R + Send + Sync + 'static,
        R: Into<ActionOutput>,
    {
        self.with_action(Action::new(name, func))
    }

    /// Register a prebuilt action under its own name.
    pub fn with_action(mut self, action: Action<C>) -> Self {
        self.actions.insert(action.name().to_string(), action);
        self
    }

    /// Register a guard under `name`.
    pub fn guard<F>(self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&C, &Event) -> bool + Send + Sync + 'static,
    {
        self.with_guard(Guard::new(name, predicate))
    }

    pub fn with_guard(mut self, guard: Guard<C>) -> Self {
        self.guards.insert(guard.name().to_string(), guard);
        self
    }

    /// Combine two setups. Entries of `other` win on name clashes.
    pub fn merge(mut self, other: Setup<C>) -> Self {
        self.actions.extend(other.actions);
        self.guards.extend(other.guards);
        self
    }

    pub fn find_action(&self, name: &str) -> Option<&Action<C>> {
        self.actions.get(name)
    }

    pub fn find_guard(&self, name: &str) -> Option<&Guard<C>> {
        self.guards.get(name)
    }
}

impl<C> Default for Setup<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Setup<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<_> = self.actions.keys().collect();
        let mut guards: Vec<_> = self.guards.keys().collect();
        actions.sort();
        guards.sort();
        f.debug_struct("Setup")
            .field("actions", &actions)
            .field("guards", &guards)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_later_entries() {
        let first: Setup<i32> = Setup::new()
            .action("set", |n: &mut i32, _: &Event| *n = 1)
            .guard("always", |_: &i32, _: &Event| false);
        let second: Setup<i32> = Setup::new().guard("always", |_: &i32, _: &Event| true);

        let merged = first.merge(second);

        let mut n = 0;
        merged
            .find_action("set")
            .unwrap()
            .execute(&mut n, &Event::named("E"));
        assert_eq!(n, 1);
        assert!(merged.find_guard("always").unwrap().check(&n, &Event::named("E")));
    }

    #[test]
    fn prebuilt_entries_use_their_names() {
        let setup: Setup<()> = Setup::new()
            .with_action(Action::new("log", |_: &mut (), _: &Event| {}))
            .with_guard(Guard::new("ok", |_: &(), _: &Event| true));

        assert_eq!(setup.find_action("log").unwrap().name(), "log");
        assert_eq!(setup.find_guard("ok").unwrap().name(), "ok");
    }
}
