//! hsmkit: a hierarchical state machine (statechart) engine
//!
//! States form a tree. Events are resolved against the active state and
//! bubble to ancestors until some state handles them; a handler is an ordered
//! list of guarded transitions, and the first one whose guard passes wins.
//! Transitions exit states innermost-first up to the least common ancestor,
//! enter outermost-first down to the target, and follow initial children
//! until a leaf is active.
//!
//! # Core Concepts
//!
//! - **Configuration**: a [`StateConfig`] tree, written in code or parsed from
//!   JSON, plus a [`Setup`] of named actions and guards
//! - **Actions**: run against a shared context; outputs may be immediate or
//!   pending futures, collected in a [`DispatchResult`]
//! - **Notifications**: listeners see every dispatched event and every hop of
//!   the active-state pointer
//!
//! # Example
//!
//! ```rust
//! use hsmkit::{MachineBuilder, StateConfig};
//! use hsmkit::core::Event;
//! use serde_json::Value;
//!
//! let config = StateConfig::new()
//!     .initial("disconnected")
//!     .state("disconnected", StateConfig::new().on("CONNECT", "connected"))
//!     .state(
//!         "connected",
//!         StateConfig::new()
//!             .initial("idle")
//!             .entry("greet")
//!             .state("idle", StateConfig::new().on("SEND", "sending"))
//!             .state("sending", StateConfig::new().on("SENT", "idle")),
//!     );
//!
//! let mut machine = MachineBuilder::new()
//!     .config(config)
//!     .action("greet", |greetings: &mut u32, _: &Event| *greetings += 1)
//!     .build()
//!     .unwrap();
//!
//! machine.start();
//! let result = machine.dispatch("CONNECT", Value::Null).unwrap();
//!
//! assert_eq!(machine.state().unwrap().name(), "(root).connected.idle");
//! assert_eq!(result.entry().len(), 1);
//! assert_eq!(*machine.context(), 1);
//! ```

pub mod assign;
pub mod builder;
pub mod config;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder, TransitionBuilder};
pub use config::{Setup, StateConfig};
pub use crate::core::{Action, ActionOutput, ActionResult, Event, Guard};
pub use engine::{DispatchError, DispatchResult, Notification, StateMachine, Topic};
