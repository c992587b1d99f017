//! Declarative state tree configuration.

use super::refs::ActionRef;
use super::transition::EventConfig;
use crate::builder::BuildError;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;

/// Configuration of one state and, recursively, its children.
///
/// Consumed once when a machine is built. Child states and event handlers
/// keep their declaration order.
///
/// # Example
///
/// ```rust
/// use hsmkit::config::StateConfig;
///
/// let config: StateConfig<()> = StateConfig::new()
///     .initial("idle")
///     .state("idle", StateConfig::new().on("FETCH", "loading"))
///     .state("loading", StateConfig::new());
///
/// assert_eq!(config.initial.as_deref(), Some("idle"));
/// assert_eq!(config.states.len(), 2);
/// ```
#[derive(Deserialize)]
#[serde(bound = "")]
pub struct StateConfig<C> {
    /// Short alias registered next to the dotted name.
    #[serde(default)]
    pub id: Option<String>,

    /// Child key entered automatically when this state becomes active.
    #[serde(default)]
    pub initial: Option<String>,

    #[serde(default)]
    pub entry: Vec<ActionRef<C>>,

    #[serde(default)]
    pub exit: Vec<ActionRef<C>>,

    /// Event type (or `*`) to handler.
    #[serde(default)]
    pub on: IndexMap<String, EventConfig<C>>,

    #[serde(default)]
    pub states: IndexMap<String, StateConfig<C>>,
}

impl<C> StateConfig<C> {
    pub fn new() -> Self {
        Self {
            id: None,
            initial: None,
            entry: Vec::new(),
            exit: Vec::new(),
            on: IndexMap::new(),
            states: IndexMap::new(),
        }
    }

    /// Parse a configuration from JSON.
    ///
    /// Action and guard names are kept as references; they are resolved
    /// against a setup when the machine is built.
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        serde_json::from_str(json).map_err(|e| BuildError::InvalidConfig(e.to_string()))
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn initial(mut self, child: impl Into<String>) -> Self {
        self.initial = Some(child.into());
        self
    }

    /// Append an entry action.
    pub fn entry(mut self, action: impl Into<ActionRef<C>>) -> Self {
        self.entry.push(action.into());
        self
    }

    /// Append an exit action.
    pub fn exit(mut self, action: impl Into<ActionRef<C>>) -> Self {
        self.exit.push(action.into());
        self
    }

    /// Set the handler for an event type, replacing any previous one.
    pub fn on(mut self, event: impl Into<String>, config: impl Into<EventConfig<C>>) -> Self {
        self.on.insert(event.into(), config.into());
        self
    }

    /// Add a child state.
    pub fn state(mut self, name: impl Into<String>, config: StateConfig<C>) -> Self {
        self.states.insert(name.into(), config);
        self
    }
}

impl<C> Default for StateConfig<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for StateConfig<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateConfig")
            .field("id", &self.id)
            .field("initial", &self.initial)
            .field("entry", &self.entry)
            .field("exit", &self.exit)
            .field("on", &self.on)
            .field("states", &self.states)
            .finish()
    }
}
