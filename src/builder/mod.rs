//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders for machines and transition
//! descriptors, plus the errors raised while validating a configuration.

pub mod error;
pub mod machine;
pub mod transition;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use transition::TransitionBuilder;

use crate::config::TransitionConfig;
use crate::core::Event;

/// Create an unconditional transition to `target`.
///
/// # Example
///
/// ```
/// use hsmkit::builder::simple_transition;
///
/// let transition = simple_transition::<()>("loading");
/// assert_eq!(transition.target.as_deref(), Some("loading"));
/// assert!(transition.guard.is_none());
/// ```
pub fn simple_transition<C>(target: impl Into<String>) -> TransitionConfig<C> {
    TransitionBuilder::new().to(target).build()
}

/// Create a transition to `target` taken only when `guard` passes.
///
/// # Example
///
/// ```
/// use hsmkit::builder::guarded_transition;
/// use hsmkit::core::Event;
///
/// let transition = guarded_transition("done", |n: &u32, _: &Event| *n >= 3);
/// assert!(transition.guard.is_some());
/// ```
pub fn guarded_transition<C, F>(target: impl Into<String>, guard: F) -> TransitionConfig<C>
where
    F: Fn(&C, &Event) -> bool + Send + Sync + 'static,
{
    TransitionBuilder::new().to(target).when(guard).build()
}
