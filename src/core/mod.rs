//! Core value types shared by configuration and runtime.
//!
//! - Events dispatched to a machine
//! - Actions and the outputs they produce
//! - Guard predicates for transition control
//! - Immutable history of state hops

mod action;
mod event;
mod guard;
mod history;

pub use action::{Action, ActionFn, ActionOutput, ActionResult};
pub use event::{Event, START_EVENT, WILDCARD};
pub use guard::Guard;
pub use history::{TransitionHistory, TransitionRecord};
