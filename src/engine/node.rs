//! State tree nodes and their event handlers.

use crate::core::{Action, ActionResult, Event, Guard};
use indexmap::IndexMap;
use tracing::trace;

/// Index of a node in a machine's state tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

/// What a matched handler produced: the resolved target, if any, and the
/// results of the actions it fired.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub target: Option<StateId>,
    pub actions: Vec<ActionResult>,
}

/// One candidate transition, with guard, target and actions resolved to
/// direct handles at build time.
pub(crate) struct EventNode<C> {
    pub(crate) guard: Option<Guard<C>>,
    pub(crate) target: Option<StateId>,
    pub(crate) actions: Vec<Action<C>>,
}

impl<C> EventNode<C> {
    /// Evaluate the guard and, if it passes, run the actions in order.
    /// Returns `None` when the guard rejects the event.
    fn execute(&self, context: &mut C, event: &Event, active: &str) -> Option<Resolution> {
        if let Some(guard) = &self.guard {
            if !guard.check(context, event) {
                trace!(guard = guard.name(), event = %event.kind, "guard rejected event");
                return None;
            }
        }

        let actions = run_actions(&self.actions, context, event, Some(active));
        Some(Resolution {
            target: self.target,
            actions,
        })
    }
}

/// Transition table for one event type on one state.
///
/// Descriptors are tried in declaration order; the first whose guard passes
/// wins and the rest are never evaluated.
pub struct StateEvent<C> {
    name: String,
    pub(crate) nodes: Vec<EventNode<C>>,
}

impl<C> StateEvent<C> {
    pub(crate) fn new(name: String, nodes: Vec<EventNode<C>>) -> Self {
        Self { name, nodes }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of candidate transitions.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Targets of the candidate transitions, in order.
    pub fn targets(&self) -> impl Iterator<Item = Option<StateId>> + '_ {
        self.nodes.iter().map(|node| node.target)
    }

    /// Run the first matching descriptor. `None` means no guard passed.
    pub(crate) fn execute(&self, context: &mut C, event: &Event, active: &str) -> Option<Resolution> {
        self.nodes
            .iter()
            .find_map(|node| node.execute(context, event, active))
    }
}

/// One state in the hierarchy.
///
/// Nodes live in an arena owned by the machine; parent and children are
/// indices into it. The shape never changes after the machine is built.
pub struct StateNode<C> {
    pub(crate) id: StateId,
    pub(crate) name: String,
    pub(crate) alias: Option<String>,
    pub(crate) parent: Option<StateId>,
    pub(crate) initial: Option<StateId>,
    pub(crate) entry: Vec<Action<C>>,
    pub(crate) exit: Vec<Action<C>>,
    pub(crate) children: IndexMap<String, StateId>,
    pub(crate) on: IndexMap<String, StateEvent<C>>,
}

impl<C> StateNode<C> {
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Dotted path from the root, e.g. `(root).connected.idle`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The optional short alias from the configuration.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    pub fn initial(&self) -> Option<StateId> {
        self.initial
    }

    /// Child keys and ids, in declaration order.
    pub fn children(&self) -> impl Iterator<Item = (&str, StateId)> + '_ {
        self.children.iter().map(|(key, id)| (key.as_str(), *id))
    }

    pub fn child(&self, key: &str) -> Option<StateId> {
        self.children.get(key).copied()
    }

    pub fn event(&self, kind: &str) -> Option<&StateEvent<C>> {
        self.on.get(kind)
    }

    /// Event types this state handles directly.
    pub fn events(&self) -> impl Iterator<Item = &str> + '_ {
        self.on.keys().map(String::as_str)
    }

    pub fn entry_actions(&self) -> impl Iterator<Item = &str> + '_ {
        self.entry.iter().map(Action::name)
    }

    pub fn exit_actions(&self) -> impl Iterator<Item = &str> + '_ {
        self.exit.iter().map(Action::name)
    }

    /// A state without an `initial` child is a leaf for transition purposes.
    pub fn is_leaf(&self) -> bool {
        self.initial.is_none()
    }

    /// The handler for `kind` on this node, falling back to the wildcard.
    pub(crate) fn handler(&self, kind: &str) -> Option<&StateEvent<C>> {
        self.on
            .get(kind)
            .or_else(|| self.on.get(crate::core::WILDCARD))
    }
}

/// Invoke actions in order, recording each output without awaiting it.
pub(crate) fn run_actions<C>(
    actions: &[Action<C>],
    context: &mut C,
    event: &Event,
    active: Option<&str>,
) -> Vec<ActionResult> {
    actions
        .iter()
        .map(|action| {
            trace!(action = action.name(), event = %event.kind, "running action");
            ActionResult {
                state: active.map(str::to_string),
                action: action.name().to_string(),
                output: action.execute(context, event),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(guard: Option<bool>, target: Option<usize>, actions: &[&str]) -> EventNode<Vec<String>> {
        EventNode {
            guard: guard.map(|pass| Guard::new("g", move |_: &Vec<String>, _: &Event| pass)),
            target: target.map(StateId),
            actions: actions
                .iter()
                .map(|name| {
                    let label = name.to_string();
                    Action::new(*name, move |log: &mut Vec<String>, _: &Event| {
                        log.push(label.clone());
                        json!(label.clone())
                    })
                })
                .collect(),
        }
    }

    #[test]
    fn first_passing_descriptor_wins() {
        let event = StateEvent::new(
            "EVENT_NAME".to_string(),
            vec![
                node(Some(false), Some(1), &["skipped"]),
                node(Some(true), Some(2), &["first"]),
                node(Some(true), Some(3), &["second"]),
            ],
        );
        let mut log = Vec::new();

        let resolution = event
            .execute(&mut log, &Event::named("EVENT_NAME"), "(root)")
            .unwrap();

        assert_eq!(resolution.target, Some(StateId(2)));
        assert_eq!(resolution.actions.len(), 1);
        assert_eq!(resolution.actions[0].action, "first");
        assert_eq!(log, vec!["first"]);
    }

    #[test]
    fn no_passing_guard_yields_none() {
        let event = StateEvent::new(
            "E".to_string(),
            vec![node(Some(false), Some(1), &["a"]), node(Some(false), None, &["b"])],
        );
        let mut log = Vec::new();

        assert!(event.execute(&mut log, &Event::named("E"), "(root)").is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn descriptor_without_actions_or_target_still_matches() {
        let event = StateEvent::new("E".to_string(), vec![node(None, None, &[])]);
        let mut log = Vec::new();

        let resolution = event.execute(&mut log, &Event::named("E"), "(root)").unwrap();

        assert!(resolution.target.is_none());
        assert!(resolution.actions.is_empty());
    }

    #[test]
    fn actions_run_in_declaration_order_and_record_state() {
        let event = StateEvent::new("E".to_string(), vec![node(None, None, &["one", "two"])]);
        let mut log = Vec::new();

        let resolution = event
            .execute(&mut log, &Event::named("E"), "(root).idle")
            .unwrap();

        let names: Vec<_> = resolution.actions.iter().map(|r| r.action.as_str()).collect();
        assert_eq!(names, vec!["one", "two"]);
        assert_eq!(log, vec!["one", "two"]);
        assert_eq!(resolution.actions[0].state.as_deref(), Some("(root).idle"));
        assert_eq!(resolution.actions[1].output.as_ready(), Some(&json!("two")));
    }
}
