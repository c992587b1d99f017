//! Declarative machine configuration.
//!
//! A machine is described by a [`StateConfig`] tree, built in code or parsed
//! from JSON, plus a [`Setup`] holding the actions and guards the tree refers
//! to by name.

mod refs;
mod setup;
mod state;
mod transition;

pub use refs::{ActionRef, GuardRef};
pub use setup::Setup;
pub use state::StateConfig;
pub use transition::{EventConfig, TransitionConfig};
