//! Arena-backed state tree: construction, name resolution, event bubbling
//! and the ancestor arithmetic behind transitions.

use super::node::{run_actions, EventNode, Resolution, StateEvent, StateId, StateNode};
use crate::builder::BuildError;
use crate::config::{ActionRef, GuardRef, Setup, StateConfig};
use crate::core::{Action, Event, Guard};
use indexmap::IndexMap;
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::trace;

/// Name of the root node.
pub const ROOT: &str = "(root)";

/// A static target waiting for the whole tree to exist before it can be
/// resolved.
struct PendingTarget {
    state: StateId,
    event: String,
    index: usize,
    target: String,
}

/// References collected while inserting nodes, resolved once every node
/// exists.
#[derive(Default)]
struct Deferred {
    targets: Vec<PendingTarget>,
    initials: Vec<(StateId, String)>,
}

pub(crate) struct StateTree<C> {
    nodes: Vec<StateNode<C>>,
    registry: HashMap<String, StateId>,
}

impl<C> StateTree<C> {
    /// Build the tree, resolve every action, guard, initial child and static
    /// target. Any unresolvable reference fails the build.
    pub(crate) fn build(config: StateConfig<C>, setup: &Setup<C>) -> Result<Self, BuildError> {
        let mut tree = Self {
            nodes: Vec::new(),
            registry: HashMap::new(),
        };
        let mut deferred = Deferred::default();

        tree.insert(ROOT.to_string(), None, &[], config, setup, &mut deferred)?;

        for (state, initial) in deferred.initials {
            let node = &mut tree.nodes[state.0];
            let child = node
                .children
                .get(&initial)
                .copied()
                .ok_or_else(|| BuildError::InitialNotFound {
                    state: node.name.clone(),
                    initial,
                })?;
            node.initial = Some(child);
        }

        tree.resolve_targets(deferred.targets)?;
        Ok(tree)
    }

    fn insert(
        &mut self,
        name: String,
        parent: Option<StateId>,
        scopes: &[String],
        config: StateConfig<C>,
        setup: &Setup<C>,
        deferred: &mut Deferred,
    ) -> Result<StateId, BuildError> {
        let id = StateId(self.nodes.len());
        trace!(state = %name, "creating state node");

        let entry = resolve_actions(&name, config.entry, setup)?;
        let exit = resolve_actions(&name, config.exit, setup)?;

        let mut on = IndexMap::new();
        for (event, event_config) in config.on {
            let transitions = event_config.into_transitions();
            if transitions.is_empty() {
                return Err(BuildError::EmptyEvent {
                    state: name.clone(),
                    event,
                });
            }

            let mut nodes = Vec::with_capacity(transitions.len());
            for (index, transition) in transitions.into_iter().enumerate() {
                let guard = transition
                    .guard
                    .map(|guard| resolve_guard(&name, &event, guard, setup))
                    .transpose()?;
                let actions = resolve_actions(&name, transition.actions, setup)?;
                if let Some(target) = transition.target {
                    deferred.targets.push(PendingTarget {
                        state: id,
                        event: event.clone(),
                        index,
                        target,
                    });
                }
                nodes.push(EventNode {
                    guard,
                    target: None,
                    actions,
                });
            }
            on.insert(event.clone(), StateEvent::new(event, nodes));
        }

        // Every ancestor id opens a scope: `<id>.<relative.path>` also names
        // this node.
        let mut scopes = scopes.to_vec();
        if let Some(alias) = &config.id {
            scopes.push(alias.clone());
        }
        self.register(name.clone(), id)?;
        for scope in &scopes {
            self.register(scope.clone(), id)?;
        }
        if let Some(initial) = config.initial {
            deferred.initials.push((id, initial));
        }

        self.nodes.push(StateNode {
            id,
            name: name.clone(),
            alias: config.id,
            parent,
            initial: None,
            entry,
            exit,
            children: IndexMap::new(),
            on,
        });

        for (key, child_config) in config.states {
            let child_name = format!("{name}.{key}");
            let child_scopes: Vec<String> =
                scopes.iter().map(|scope| format!("{scope}.{key}")).collect();
            let child = self.insert(
                child_name,
                Some(id),
                &child_scopes,
                child_config,
                setup,
                deferred,
            )?;
            self.nodes[id.0].children.insert(key, child);
        }

        Ok(id)
    }

    fn register(&mut self, key: String, id: StateId) -> Result<(), BuildError> {
        if self.registry.contains_key(&key) {
            return Err(BuildError::DuplicateId { id: key });
        }
        self.registry.insert(key, id);
        Ok(())
    }

    /// Resolve all static targets, collecting every failure.
    fn resolve_targets(&mut self, pending: Vec<PendingTarget>) -> Result<(), BuildError> {
        let checks: Vec<Validation<(), NonEmptyVec<BuildError>>> = pending
            .into_iter()
            .map(|p| match self.next_state(p.state, &p.target) {
                Some(target) => {
                    if let Some(event) = self.nodes[p.state.0].on.get_mut(&p.event) {
                        event.nodes[p.index].target = Some(target);
                    }
                    Validation::success(())
                }
                None => Validation::fail(BuildError::TargetNotFound {
                    state: self.nodes[p.state.0].name.clone(),
                    event: p.event,
                    target: p.target,
                }),
            })
            .collect();

        match Validation::all_vec(checks) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(errors) => {
                let mut errors: Vec<BuildError> = errors.iter().cloned().collect();
                if errors.len() == 1 {
                    Err(errors.remove(0))
                } else {
                    Err(BuildError::Multiple(errors))
                }
            }
        }
    }

    pub(crate) fn root(&self) -> StateId {
        StateId(0)
    }

    pub(crate) fn node(&self, id: StateId) -> &StateNode<C> {
        &self.nodes[id.0]
    }

    pub(crate) fn nodes(&self) -> &[StateNode<C>] {
        &self.nodes
    }

    /// Look a state up by dotted name or id.
    pub(crate) fn lookup(&self, key: &str) -> Option<StateId> {
        self.registry.get(key).copied()
    }

    /// Resolve a target as seen from `from`: siblings first, then the global
    /// registry, then `from`'s own children.
    pub(crate) fn next_state(&self, from: StateId, target: &str) -> Option<StateId> {
        let node = self.node(from);
        node.parent
            .and_then(|parent| self.node(parent).child(target))
            .or_else(|| self.lookup(target))
            .or_else(|| node.child(target))
    }

    /// Find a handler for the event on `from` or the nearest ancestor that has
    /// one, and run it. `None` means no state handles the event.
    pub(crate) fn dispatch(
        &self,
        from: StateId,
        context: &mut C,
        event: &Event,
    ) -> Option<Resolution> {
        let active = self.node(from).name.as_str();
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            let node = self.node(id);
            if let Some(handler) = node.handler(&event.kind) {
                trace!(state = %node.name, event = %event.kind, "handling event");
                return handler.execute(context, event, active);
            }
            trace!(state = %node.name, event = %event.kind, "bubbling event to parent");
            cursor = node.parent;
        }
        trace!(event = %event.kind, "unhandled event");
        None
    }

    /// `id` followed by each of its ancestors up to the root.
    pub(crate) fn lineage(&self, id: StateId) -> Vec<StateId> {
        let mut line = vec![id];
        let mut cursor = self.node(id).parent;
        while let Some(parent) = cursor {
            line.push(parent);
            cursor = self.node(parent).parent;
        }
        line
    }

    /// The deepest state that stays active across a transition from `current`
    /// to `target`. A target that is `current` or one of its ancestors is
    /// exited and re-entered, so its parent is used instead. `None` means
    /// everything up to and including the root is exited.
    pub(crate) fn least_common_ancestor(&self, current: StateId, target: StateId) -> Option<StateId> {
        let current_line = self.lineage(current);
        let common = self
            .lineage(target)
            .into_iter()
            .find(|id| current_line.contains(id))?;
        if common == target {
            self.node(target).parent
        } else {
            Some(common)
        }
    }

    /// States to exit (innermost first) and enter (outermost first) to move
    /// from `current` to `target`.
    pub(crate) fn exit_entry(
        &self,
        current: Option<StateId>,
        target: StateId,
    ) -> (Vec<StateId>, Vec<StateId>) {
        let Some(current) = current else {
            let mut entry = self.lineage(target);
            entry.reverse();
            return (Vec::new(), entry);
        };

        let lca = self.least_common_ancestor(current, target);
        let exit = self
            .lineage(current)
            .into_iter()
            .take_while(|id| Some(*id) != lca)
            .collect();
        let mut entry: Vec<StateId> = self
            .lineage(target)
            .into_iter()
            .take_while(|id| Some(*id) != lca)
            .collect();
        entry.reverse();
        (exit, entry)
    }

    pub(crate) fn run_exit(
        &self,
        id: StateId,
        context: &mut C,
        event: &Event,
        active: Option<&str>,
    ) -> Vec<crate::core::ActionResult> {
        run_actions(&self.node(id).exit, context, event, active)
    }

    pub(crate) fn run_entry(
        &self,
        id: StateId,
        context: &mut C,
        event: &Event,
        active: Option<&str>,
    ) -> Vec<crate::core::ActionResult> {
        run_actions(&self.node(id).entry, context, event, active)
    }
}

fn resolve_actions<C>(
    state: &str,
    refs: Vec<ActionRef<C>>,
    setup: &Setup<C>,
) -> Result<Vec<Action<C>>, BuildError> {
    refs.into_iter()
        .map(|action| match action {
            ActionRef::Inline(action) => Ok(action),
            ActionRef::Named(name) => {
                setup
                    .find_action(&name)
                    .cloned()
                    .ok_or_else(|| BuildError::ActionNotFound {
                        state: state.to_string(),
                        action: name,
                    })
            }
        })
        .collect()
}

fn resolve_guard<C>(
    state: &str,
    event: &str,
    guard: GuardRef<C>,
    setup: &Setup<C>,
) -> Result<Guard<C>, BuildError> {
    match guard {
        GuardRef::Inline(guard) => Ok(guard),
        GuardRef::Named(name) => {
            setup
                .find_guard(&name)
                .cloned()
                .ok_or_else(|| BuildError::GuardNotFound {
                    state: state.to_string(),
                    event: event.to_string(),
                    guard: name,
                })
        }
    }
}
