//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::config::{Setup, StateConfig};
use crate::core::{ActionOutput, Event};
use crate::engine::StateMachine;

/// Builder for constructing state machines with a fluent API.
///
/// # Example
///
/// ```rust
/// use hsmkit::builder::MachineBuilder;
/// use hsmkit::config::StateConfig;
/// use hsmkit::core::Event;
///
/// let mut machine = MachineBuilder::new()
///     .config(
///         StateConfig::new()
///             .initial("off")
///             .state("off", StateConfig::new().on("TOGGLE", "on"))
///             .state("on", StateConfig::new().entry("count").on("TOGGLE", "off")),
///     )
///     .action("count", |n: &mut u32, _: &Event| *n += 1)
///     .build()
///     .unwrap();
///
/// machine.start();
/// machine.dispatch("TOGGLE", serde_json::Value::Null).unwrap();
/// assert_eq!(*machine.context(), 1);
/// ```
pub struct MachineBuilder<C> {
    config: Option<StateConfig<C>>,
    setup: Setup<C>,
    context: Option<C>,
}

impl<C> MachineBuilder<C> {
    pub fn new() -> Self {
        Self {
            config: None,
            setup: Setup::new(),
            context: None,
        }
    }

    /// Set the state tree (required).
    pub fn config(mut self, config: StateConfig<C>) -> Self {
        self.config = Some(config);
        self
    }

    /// Parse the state tree from JSON.
    pub fn json(self, json: &str) -> Result<Self, BuildError> {
        Ok(self.config(StateConfig::from_json(json)?))
    }

    /// Merge a setup table into the one being built.
    pub fn setup(mut self, setup: Setup<C>) -> Self {
        self.setup = self.setup.merge(setup);
        self
    }

    pub fn action<F, R>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut C, &Event) -> R + Send + Sync + 'static,
        R: Into<ActionOutput>,
    {
        self.setup = self.setup.action(name, func);
        self
    }

    pub fn guard<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&C, &Event) -> bool + Send + Sync + 'static,
    {
        self.setup = self.setup.guard(name, predicate);
        self
    }

    /// Seed the shared context. Defaults to `C::default()`.
    pub fn context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    /// Build the machine, validating every reference in the configuration.
    pub fn build(self) -> Result<StateMachine<C>, BuildError>
    where
        C: Default,
    {
        let config = self.config.ok_or(BuildError::MissingConfig)?;
        let context = self.context.unwrap_or_default();
        StateMachine::with_context(config, self.setup, context)
    }
}

impl<C> Default for MachineBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn builder_requires_config() {
        let result = MachineBuilder::<()>::new().build();

        assert!(matches!(result, Err(BuildError::MissingConfig)));
    }

    #[test]
    fn builder_seeds_context() {
        let machine = MachineBuilder::new()
            .config(StateConfig::new())
            .context(41_u32)
            .build()
            .unwrap();

        assert_eq!(*machine.context(), 41);
    }

    #[test]
    fn builder_parses_json() {
        let mut machine = MachineBuilder::<Vec<String>>::new()
            .json(r#"{ "initial": "a", "states": { "a": { "entry": ["log"] } } }"#)
            .unwrap()
            .action("log", |log: &mut Vec<String>, e: &Event| log.push(e.kind.clone()))
            .build()
            .unwrap();

        machine.start();

        assert_eq!(machine.state().unwrap().name(), "(root).a");
        assert_eq!(machine.context(), &vec!["(machine).start".to_string()]);
    }

    #[test]
    fn builder_reports_unknown_action() {
        let result = MachineBuilder::<()>::new()
            .config(StateConfig::new().entry("missing"))
            .build();

        assert!(matches!(result, Err(BuildError::ActionNotFound { .. })));
    }

    #[test]
    fn merged_setup_is_used() {
        let mut machine = MachineBuilder::new()
            .config(
                StateConfig::new()
                    .initial("a")
                    .state("a", StateConfig::new().on("GO", "b"))
                    .state("b", StateConfig::new().entry("mark")),
            )
            .setup(Setup::new().action("mark", |n: &mut i32, _: &Event| *n = 7))
            .build()
            .unwrap();

        machine.start();
        machine.dispatch("GO", Value::Null).unwrap();

        assert_eq!(*machine.context(), 7);
    }
}
