//! Runtime: the state tree, event resolution and the transition engine.
//!
//! # Key Concepts
//!
//! - **State tree**: arena of nodes addressed by [`StateId`], registered by
//!   dotted name (`(root).connected.idle`) and optional id
//! - **Bubbling**: a state without a handler for an event (or a `*` wildcard)
//!   delegates to its parent, up to the root
//! - **Transitions**: exit innermost-first up to the least common ancestor,
//!   enter outermost-first down to the target, then follow initial children
//!   to a leaf

mod emitter;
mod machine;
mod node;
mod result;
mod tree;

pub use emitter::{Emitter, ListenerId, Notification, Topic};
pub use machine::{DispatchError, StateMachine};
pub use node::{StateEvent, StateId, StateNode};
pub use result::DispatchResult;
pub use tree::ROOT;
