//! Canned actions that update the machine context.

use crate::core::{Action, Event};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Action name used by every action built here.
pub const ASSIGN: &str = "assign";

/// Build an action that mutates the context through `update`.
///
/// # Example
///
/// ```rust
/// use hsmkit::assign::assign;
/// use hsmkit::core::Event;
///
/// #[derive(Default)]
/// struct Session {
///     user: Option<String>,
/// }
///
/// let login = assign(|session: &mut Session, event: &Event| {
///     session.user = event.data.as_str().map(str::to_string);
/// });
///
/// let mut session = Session::default();
/// login.execute(&mut session, &Event::new("LOGIN", "ada".into()));
/// assert_eq!(session.user.as_deref(), Some("ada"));
/// ```
pub fn assign<C, F>(update: F) -> Action<C>
where
    F: Fn(&mut C, &Event) + Send + Sync + 'static,
{
    Action::new(ASSIGN, move |context: &mut C, event: &Event| update(context, event))
}

/// A value written by [`assign_fields`]: either fixed or computed from the
/// context and event.
#[derive(Clone)]
pub enum Assignment {
    Value(Value),
    Computed(Arc<dyn Fn(&Value, &Event) -> Value + Send + Sync>),
}

impl Assignment {
    pub fn computed<F>(func: F) -> Self
    where
        F: Fn(&Value, &Event) -> Value + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(func))
    }

    fn evaluate(&self, context: &Value, event: &Event) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Computed(func) => func(context, event),
        }
    }
}

impl From<Value> for Assignment {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for Assignment {
    fn from(value: &str) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<i64> for Assignment {
    fn from(value: i64) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<bool> for Assignment {
    fn from(value: bool) -> Self {
        Self::Value(Value::from(value))
    }
}

/// Shallow assignment on a JSON object context: each listed key is replaced.
///
/// Computed values see the context as it was before this action ran. A
/// context that is not an object is replaced by one.
pub fn assign_fields<I, K>(fields: I) -> Action<Value>
where
    I: IntoIterator<Item = (K, Assignment)>,
    K: Into<String>,
{
    let fields: Vec<(String, Assignment)> = fields
        .into_iter()
        .map(|(key, assignment)| (key.into(), assignment))
        .collect();

    Action::new(ASSIGN, move |context: &mut Value, event: &Event| {
        let values: Vec<(String, Value)> = fields
            .iter()
            .map(|(key, assignment)| (key.clone(), assignment.evaluate(context, event)))
            .collect();

        if !context.is_object() {
            *context = Value::Object(Map::new());
        }
        if let Value::Object(map) = context {
            map.extend(values);
        }
    })
}

/// Deep assignment on a JSON context: `patch` is merged recursively.
pub fn assign_deep(patch: Value) -> Action<Value> {
    Action::new(ASSIGN, move |context: &mut Value, _: &Event| {
        merge(context, &patch);
    })
}

/// Merge `source` into `target`. Objects merge key by key, recursively; any
/// other value in `source` replaces the one in `target`.
pub fn merge(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                let nested = value.is_object() && target.get(key).is_some_and(Value::is_object);
                match target.get_mut(key) {
                    Some(existing) if nested => merge(existing, value),
                    _ => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, source) => *target = source.clone(),
    }
}
