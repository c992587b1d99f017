//! Named side effects and the values they produce.
//!
//! Actions are fired synchronously. Whatever they return is captured as an
//! [`ActionOutput`] without being awaited; asynchronous work is stored as a
//! shared future and joined later through a dispatch result.

use super::event::Event;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Signature of an action body.
pub type ActionFn<C> = dyn Fn(&mut C, &Event) -> ActionOutput + Send + Sync;

/// A named side effect invoked with the machine context and the current event.
///
/// Cloning an action is cheap; clones share the same function.
///
/// # Example
///
/// ```rust
/// use hsmkit::core::{Action, Event};
///
/// let increment = Action::new("increment", |count: &mut u32, _event: &Event| {
///     *count += 1;
/// });
///
/// let mut count = 0;
/// increment.execute(&mut count, &Event::named("TICK"));
/// assert_eq!(count, 1);
/// assert_eq!(increment.name(), "increment");
/// ```
pub struct Action<C> {
    name: String,
    func: Arc<ActionFn<C>>,
}

impl<C> Action<C> {
    /// Create an action from a closure.
    ///
    /// The closure may return anything convertible into an [`ActionOutput`]:
    /// `()`, a JSON value, a string, or an explicit pending output.
    pub fn new<F, R>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut C, &Event) -> R + Send + Sync + 'static,
        R: Into<ActionOutput>,
    {
        Self {
            name: name.into(),
            func: Arc::new(move |context: &mut C, event: &Event| func(context, event).into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the action. The output is returned as-is, pending or not.
    pub fn execute(&self, context: &mut C, event: &Event) -> ActionOutput {
        (self.func)(context, event)
    }
}

impl<C> Clone for Action<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<C> fmt::Debug for Action<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("name", &self.name).finish()
    }
}

/// Output captured from one action invocation.
#[derive(Clone)]
pub enum ActionOutput {
    /// The action completed synchronously.
    Ready(Value),

    /// The action started asynchronous work; await it through
    /// [`ActionOutput::resolve`] or a dispatch result.
    Pending(Shared<BoxFuture<'static, Value>>),
}

impl ActionOutput {
    /// Output of an action that returns nothing.
    pub fn none() -> Self {
        Self::Ready(Value::Null)
    }

    pub fn ready(value: impl Into<Value>) -> Self {
        Self::Ready(value.into())
    }

    /// Wrap a future. The future is not polled until someone awaits it, so
    /// work that must run regardless should be spawned by the action.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Value> + Send + 'static,
    {
        Self::Pending(future.boxed().shared())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// The synchronous value, if there is one.
    pub fn as_ready(&self) -> Option<&Value> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Pending(_) => None,
        }
    }

    /// Await the output. Pending outputs can be resolved any number of times.
    pub async fn resolve(&self) -> Value {
        match self {
            Self::Ready(value) => value.clone(),
            Self::Pending(shared) => shared.clone().await,
        }
    }
}

impl fmt::Debug for ActionOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

impl From<()> for ActionOutput {
    fn from(_: ()) -> Self {
        Self::none()
    }
}

impl From<Value> for ActionOutput {
    fn from(value: Value) -> Self {
        Self::Ready(value)
    }
}

impl From<&str> for ActionOutput {
    fn from(value: &str) -> Self {
        Self::Ready(Value::from(value))
    }
}

impl From<String> for ActionOutput {
    fn from(value: String) -> Self {
        Self::Ready(Value::from(value))
    }
}

impl From<bool> for ActionOutput {
    fn from(value: bool) -> Self {
        Self::Ready(Value::from(value))
    }
}

impl From<i64> for ActionOutput {
    fn from(value: i64) -> Self {
        Self::Ready(Value::from(value))
    }
}

/// Record of one executed action.
#[derive(Clone, Debug)]
pub struct ActionResult {
    /// Name of the active state when the action ran. `None` only during the
    /// first hop of `start()`, before any state is active.
    pub state: Option<String>,
    /// Name of the action.
    pub action: String,
    /// What the action returned.
    pub output: ActionOutput,
}
