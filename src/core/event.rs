//! Events delivered to a state machine.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event type used for the synthetic event that drives `start()`.
pub const START_EVENT: &str = "(machine).start";

/// Event type matched by wildcard handlers.
pub const WILDCARD: &str = "*";

/// An event dispatched to a machine: a type name plus an arbitrary payload.
///
/// Actions and guards receive the event by reference, so the payload is
/// available to every handler along the bubbling path.
///
/// # Example
///
/// ```rust
/// use hsmkit::core::Event;
/// use serde_json::json;
///
/// let event = Event::new("FETCH", json!({ "page": 2 }));
/// assert_eq!(event.kind, "FETCH");
/// assert_eq!(event.data["page"], 2);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// The event type, matched against a state's `on` table.
    #[serde(rename = "type")]
    pub kind: String,
    /// Payload passed through to actions and guards.
    #[serde(default)]
    pub data: Value,
}

impl Event {
    pub fn new(kind: impl Into<String>, data: Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }

    /// An event without payload.
    pub fn named(kind: impl Into<String>) -> Self {
        Self::new(kind, Value::Null)
    }

    pub(crate) fn start() -> Self {
        Self::named(START_EVENT)
    }
}
