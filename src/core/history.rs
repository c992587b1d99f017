//! Transition history tracking.
//!
//! Every hop of the active-state pointer is recorded as an immutable
//! [`TransitionRecord`]. Recording returns a new history and leaves the
//! previous value untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single hop of the active state.
///
/// # Example
///
/// ```rust
/// use hsmkit::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: Some("(root).idle".to_string()),
///     to: "(root).loading".to_string(),
///     event: "FETCH".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to, "(root).loading");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The previously active state, `None` for the first hop after start.
    pub from: Option<String>,
    /// The newly active state
    pub to: String,
    /// Type of the event that caused the hop
    pub event: String,
    /// When the hop occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of hops.
///
/// # Example
///
/// ```rust
/// use hsmkit::core::{TransitionHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let history = TransitionHistory::new()
///     .record(TransitionRecord {
///         from: None,
///         to: "(root)".to_string(),
///         event: "(machine).start".to_string(),
///         timestamp: Utc::now(),
///     })
///     .record(TransitionRecord {
///         from: Some("(root)".to_string()),
///         to: "(root).idle".to_string(),
///         event: "(machine).start".to_string(),
///         timestamp: Utc::now(),
///     });
///
/// assert_eq!(history.path(), vec!["(root)", "(root).idle"]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransitionHistory {
    transitions: Vec<TransitionRecord>,
}

impl TransitionHistory {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a hop, returning a new history.
    ///
    /// This does not mutate the existing history.
    pub fn record(&self, transition: TransitionRecord) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Names of the states traversed, in order.
    ///
    /// Starts with the `from` state of the first record when there is one,
    /// then the `to` state of every record.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(from) = self.transitions.first().and_then(|t| t.from.as_deref()) {
            path.push(from);
        }
        for transition in &self.transitions {
            path.push(transition.to.as_str());
        }
        path
    }

    /// Time between the first and the last record, `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.transitions.last()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
