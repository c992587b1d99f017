//! Guard predicates for controlling transitions.
//!
//! Guards are pure boolean functions over the machine context and the
//! dispatched event. They decide whether a transition descriptor is eligible;
//! they never mutate anything.

use super::event::Event;
use std::fmt;
use std::sync::Arc;

/// Predicate that determines if a transition descriptor applies.
///
/// A guard returning `false` is not an error: the descriptor is skipped and
/// the next one for the same event is tried.
///
/// # Example
///
/// ```rust
/// use hsmkit::core::{Event, Guard};
///
/// struct Cart {
///     items: usize,
/// }
///
/// let has_items = Guard::new("hasItems", |cart: &Cart, _event: &Event| cart.items > 0);
///
/// assert!(has_items.check(&Cart { items: 2 }, &Event::named("CHECKOUT")));
/// assert!(!has_items.check(&Cart { items: 0 }, &Event::named("CHECKOUT")));
/// ```
pub struct Guard<C> {
    name: String,
    predicate: Arc<dyn Fn(&C, &Event) -> bool + Send + Sync>,
}

impl<C> Guard<C> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and thread-safe (Send + Sync).
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&C, &Event) -> bool + Send + Sync + 'static,
    {
        Guard {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check whether the guard allows the transition.
    pub fn check(&self, context: &C, event: &Event) -> bool {
        (self.predicate)(context, event)
    }
}

impl<C> Clone for Guard<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<C> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn guard_reads_context() {
        let guard = Guard::new("positive", |n: &i32, _: &Event| *n > 0);

        assert!(guard.check(&1, &Event::named("E")));
        assert!(!guard.check(&0, &Event::named("E")));
    }

    #[test]
    fn guard_reads_event_payload() {
        let guard = Guard::new("isAdmin", |_: &(), e: &Event| e.data["role"] == "admin");

        assert!(guard.check(&(), &Event::new("LOGIN", json!({ "role": "admin" }))));
        assert!(!guard.check(&(), &Event::new("LOGIN", json!({ "role": "guest" }))));
    }

    #[test]
    fn guard_is_deterministic() {
        let guard = Guard::new("even", |n: &i32, _: &Event| n % 2 == 0);
        let event = Event::named("E");

        let result1 = guard.check(&4, &event);
        let result2 = guard.check(&4, &event);

        assert_eq!(result1, result2);
    }
}
