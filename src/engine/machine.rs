//! State machine: owns the tree, the context and the active-state pointer.

use super::emitter::{Emitter, ListenerId, Notification, Topic};
use super::node::{StateId, StateNode};
use super::result::DispatchResult;
use super::tree::StateTree;
use crate::builder::{BuildError, MachineBuilder};
use crate::config::{Setup, StateConfig};
use crate::core::{ActionResult, Event, TransitionHistory, TransitionRecord};
use chrono::Utc;
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors from using a machine incorrectly.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    #[error("machine is not started")]
    NotStarted,
}

/// Entry and exit results of one transition.
#[derive(Debug, Default)]
struct Outcome {
    entry: Vec<ActionResult>,
    exit: Vec<ActionResult>,
}

/// A hierarchical state machine.
///
/// Built once from a [`StateConfig`] and a [`Setup`]; inert until
/// [`start`](StateMachine::start) is called. Every dispatch runs to
/// completion synchronously. Asynchronous action outputs are handed back in
/// the [`DispatchResult`] without being awaited.
///
/// Actions that panic leave the machine wherever it got to: exit and entry
/// sequences are not rolled back.
///
/// # Example
///
/// ```rust
/// use hsmkit::config::{Setup, StateConfig};
/// use hsmkit::engine::StateMachine;
/// use serde_json::Value;
///
/// let config = StateConfig::new()
///     .initial("idle")
///     .state("idle", StateConfig::new().on("FETCH", "loading"))
///     .state(
///         "loading",
///         StateConfig::new()
///             .on("RESOLVE", "success")
///             .on("REJECT", "failure"),
///     )
///     .state("success", StateConfig::new())
///     .state("failure", StateConfig::new());
///
/// let mut machine: StateMachine<()> = StateMachine::new(config, Setup::new()).unwrap();
/// machine.start();
/// assert_eq!(machine.state().unwrap().name(), "(root).idle");
///
/// machine.dispatch("FETCH", Value::Null).unwrap();
/// machine.dispatch("RESOLVE", Value::Null).unwrap();
/// assert_eq!(machine.state().unwrap().name(), "(root).success");
/// ```
pub struct StateMachine<C> {
    tree: StateTree<C>,
    context: C,
    current: Option<StateId>,
    emitter: Emitter,
    history: TransitionHistory,
}

impl<C> StateMachine<C> {
    /// Build a machine with a default context.
    pub fn new(config: StateConfig<C>, setup: Setup<C>) -> Result<Self, BuildError>
    where
        C: Default,
    {
        Self::with_context(config, setup, C::default())
    }

    /// Build a machine seeded with `context`.
    pub fn with_context(
        config: StateConfig<C>,
        setup: Setup<C>,
        context: C,
    ) -> Result<Self, BuildError> {
        let tree = StateTree::build(config, &setup)?;
        debug!(states = tree.nodes().len(), "state machine built");
        Ok(Self {
            tree,
            context,
            current: None,
            emitter: Emitter::new(),
            history: TransitionHistory::new(),
        })
    }

    pub fn builder() -> MachineBuilder<C> {
        MachineBuilder::new()
    }

    /// Enter the root and descend through initial states to a leaf.
    ///
    /// Starting a running machine exits everything up to the root and enters
    /// it again.
    pub fn start(&mut self) -> DispatchResult {
        debug!("starting state machine");
        let outcome = self.transition(self.tree.root(), &Event::start());
        DispatchResult::new(Vec::new(), outcome.entry, outcome.exit)
    }

    /// Clear the active state. No exit actions run.
    pub fn stop(&mut self) {
        debug!("stopping state machine");
        self.current = None;
    }

    pub fn is_started(&self) -> bool {
        self.current.is_some()
    }

    /// The active state.
    pub fn state(&self) -> Result<&StateNode<C>, DispatchError> {
        self.current
            .map(|id| self.tree.node(id))
            .ok_or(DispatchError::NotStarted)
    }

    /// Dispatch an event by type with a payload.
    pub fn dispatch(
        &mut self,
        event: impl Into<String>,
        data: Value,
    ) -> Result<DispatchResult, DispatchError> {
        self.send(Event::new(event, data))
    }

    /// Dispatch a prebuilt event.
    ///
    /// The active state handles it, or the nearest ancestor with a handler. A
    /// matched handler without a target fires its actions only; an event no
    /// state handles yields an empty result.
    pub fn send(&mut self, event: Event) -> Result<DispatchResult, DispatchError> {
        let current = self.current.ok_or(DispatchError::NotStarted)?;

        self.emitter.emit(&Notification::Event(&event));

        let Some(resolution) = self.tree.dispatch(current, &mut self.context, &event) else {
            return Ok(DispatchResult::empty());
        };

        let Some(target) = resolution.target else {
            return Ok(DispatchResult::new(resolution.actions, Vec::new(), Vec::new()));
        };

        let outcome = self.transition(target, &event);
        Ok(DispatchResult::new(
            resolution.actions,
            outcome.entry,
            outcome.exit,
        ))
    }

    /// Move the active state to `target`.
    ///
    /// Exits from the active state up to the least common ancestor, enters
    /// down to `target`, then keeps entering initial children until a leaf is
    /// active. The pointer moves, and a transition notification is emitted,
    /// once per state reached.
    fn transition(&mut self, target: StateId, event: &Event) -> Outcome {
        let mut outcome = Outcome::default();
        let mut next = Some(target);

        while let Some(hop) = next {
            let (exiting, entering) = self.tree.exit_entry(self.current, hop);

            for id in exiting {
                let active = self.current.map(|id| self.tree.node(id).name());
                let results = self.tree.run_exit(id, &mut self.context, event, active);
                outcome.exit.extend(results);
            }
            for id in entering {
                let active = self.current.map(|id| self.tree.node(id).name());
                let results = self.tree.run_entry(id, &mut self.context, event, active);
                outcome.entry.extend(results);
            }

            let prev = self.current.replace(hop);
            self.record_hop(hop, prev, event);
            next = self.tree.node(hop).initial();
        }

        outcome
    }

    fn record_hop(&mut self, next: StateId, prev: Option<StateId>, event: &Event) {
        let next_name = self.tree.node(next).name();
        let prev_name = prev.map(|id| self.tree.node(id).name());
        debug!(
            from = prev_name.unwrap_or("-"),
            to = next_name,
            event = %event.kind,
            "transition"
        );

        self.history = self.history.record(TransitionRecord {
            from: prev_name.map(str::to_string),
            to: next_name.to_string(),
            event: event.kind.clone(),
            timestamp: Utc::now(),
        });
        self.emitter.emit(&Notification::Transition {
            next: next_name,
            prev: prev_name,
        });
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    /// Mutable access to the shared context outside of actions.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn root(&self) -> &StateNode<C> {
        self.tree.node(self.tree.root())
    }

    /// Look a state up by dotted name or id.
    pub fn node(&self, key: &str) -> Option<&StateNode<C>> {
        self.tree.lookup(key).map(|id| self.tree.node(id))
    }

    /// Look a state up by index. `None` for an id from another machine.
    pub fn node_by_id(&self, id: StateId) -> Option<&StateNode<C>> {
        self.tree.nodes().get(id.0)
    }

    /// Whether the named state is active, either as the active leaf or as one
    /// of its ancestors.
    pub fn matches(&self, key: &str) -> bool {
        match (self.current, self.tree.lookup(key)) {
            (Some(current), Some(id)) => self.tree.lineage(current).contains(&id),
            _ => false,
        }
    }

    /// Names of the active state and its ancestors, innermost first.
    pub fn active_path(&self) -> Vec<&str> {
        self.current
            .map(|id| {
                self.tree
                    .lineage(id)
                    .into_iter()
                    .map(|id| self.tree.node(id).name())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    /// Subscribe to machine notifications.
    pub fn on<F>(&mut self, topic: Topic, callback: F) -> ListenerId
    where
        F: FnMut(&Notification<'_>) + Send + 'static,
    {
        trace!(?topic, "listener added");
        self.emitter.on(topic, callback)
    }

    pub fn once<F>(&mut self, topic: Topic, callback: F) -> ListenerId
    where
        F: FnMut(&Notification<'_>) + Send + 'static,
    {
        self.emitter.once(topic, callback)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.emitter.off(id)
    }
}

impl<C> fmt::Debug for StateMachine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("state", &self.current.map(|id| self.tree.node(id).name()))
            .field("states", &self.tree.nodes().len())
            .field("emitter", &self.emitter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn toggle() -> StateConfig<u32> {
        StateConfig::new()
            .initial("off")
            .state("off", StateConfig::new().on("TOGGLE", "on"))
            .state("on", StateConfig::new().entry("count").on("TOGGLE", "off"))
    }

    fn machine() -> StateMachine<u32> {
        let setup = Setup::new().action("count", |n: &mut u32, _: &Event| *n += 1);
        StateMachine::new(toggle(), setup).unwrap()
    }

    #[test]
    #[traced_test]
    fn hops_are_logged() {
        let mut machine = machine();
        machine.start();
        machine.dispatch("TOGGLE", Value::Null).unwrap();

        assert!(logs_contain("starting state machine"));
        assert!(logs_contain("(root).on"));
        assert!(logs_contain("TOGGLE"));
        assert!(logs_contain("handling event"));
        assert!(logs_contain("transition"));
    }

    #[test]
    #[traced_test]
    fn bubbling_is_traced() {
        let mut machine = machine();
        machine.start();
        machine.dispatch("MISSING", Value::Null).unwrap();

        assert!(logs_contain("unhandled event"));
    }

    #[test]
    fn entry_actions_run_on_each_visit() {
        let mut machine = machine();
        machine.start();

        for _ in 0..4 {
            machine.dispatch("TOGGLE", Value::Null).unwrap();
        }

        assert_eq!(*machine.context(), 2);
        assert_eq!(machine.history().len(), 6);
    }

    #[test]
    fn stop_keeps_history_and_context() {
        let mut machine = machine();
        machine.start();
        machine.dispatch("TOGGLE", Value::Null).unwrap();

        machine.stop();

        assert!(machine.state().is_err());
        assert_eq!(*machine.context(), 1);
        assert_eq!(machine.history().len(), 3);
        assert!(machine.active_path().is_empty());
    }

    #[test]
    fn node_by_id_matches_lookup() {
        let machine = machine();
        let on = machine.node("(root).on").unwrap();

        assert_eq!(machine.node_by_id(on.id()).map(StateNode::name), Some("(root).on"));
        assert_eq!(on.parent(), Some(machine.root().id()));
    }

    #[test]
    fn foreign_id_is_not_found() {
        let machine = machine();
        let larger: StateMachine<u32> = StateMachine::new(
            toggle().state("extra", StateConfig::new().state("deep", StateConfig::new())),
            Setup::new().action("count", |n: &mut u32, _: &Event| *n += 1),
        )
        .unwrap();
        let deep = larger.node("(root).extra.deep").unwrap().id();

        assert!(machine.node_by_id(deep).is_none());
    }

    #[test]
    fn debug_shows_active_state() {
        let mut machine = machine();
        machine.start();

        let rendered = format!("{machine:?}");
        assert!(rendered.contains("(root).off"));
    }
}
