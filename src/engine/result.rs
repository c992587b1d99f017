//! Per-dispatch bundle of action outcomes.

use crate::core::ActionResult;
use futures::future::join_all;
use serde_json::Value;

/// Results of one dispatch: the event's own actions, then the entry and exit
/// actions of the transition it caused.
///
/// The engine never awaits action outputs. [`DispatchResult::wait`] and
/// [`DispatchResult::wait_all`] are the only way to observe asynchronous
/// actions completing.
///
/// Pending outputs are lazy: their futures make progress only while someone
/// awaits them. Dropping a result without waiting on it (and without keeping
/// a clone of the output) means that asynchronous work never runs. Spawn the
/// work inside the action if it must proceed on its own.
#[derive(Clone, Debug, Default)]
pub struct DispatchResult {
    actions: Vec<ActionResult>,
    entry: Vec<ActionResult>,
    exit: Vec<ActionResult>,
}

impl DispatchResult {
    pub fn new(actions: Vec<ActionResult>, entry: Vec<ActionResult>, exit: Vec<ActionResult>) -> Self {
        Self {
            actions,
            entry,
            exit,
        }
    }

    /// Result of a dispatch nothing handled.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[ActionResult] {
        &self.actions
    }

    pub fn entry(&self) -> &[ActionResult] {
        &self.entry
    }

    pub fn exit(&self) -> &[ActionResult] {
        &self.exit
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.entry.is_empty() && self.exit.is_empty()
    }

    /// Every result, in search order: actions, entry, exit.
    pub fn iter(&self) -> impl Iterator<Item = &ActionResult> + '_ {
        self.actions
            .iter()
            .chain(self.entry.iter())
            .chain(self.exit.iter())
    }

    /// The first result recorded for `action`.
    pub fn find(&self, action: &str) -> Option<&ActionResult> {
        self.iter().find(|result| result.action == action)
    }

    /// Await the output of the first result recorded for `action`.
    /// Returns `None` when no such action ran.
    pub async fn wait(&self, action: &str) -> Option<Value> {
        let output = self.find(action)?.output.clone();
        Some(output.resolve().await)
    }

    /// Await every output concurrently, in search order.
    pub async fn wait_all(&self) -> Vec<Value> {
        join_all(self.iter().map(|result| result.output.resolve())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ActionOutput;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn recorded(action: &str, output: ActionOutput) -> ActionResult {
        ActionResult {
            state: Some("(root)".to_string()),
            action: action.to_string(),
            output,
        }
    }

    #[test]
    fn empty_result_has_nothing() {
        let result = DispatchResult::empty();
        assert!(result.is_empty());
        assert!(result.find("anything").is_none());
    }

    #[test]
    fn find_searches_actions_before_entry_and_exit() {
        let result = DispatchResult::new(
            vec![recorded("log", ActionOutput::from("from actions"))],
            vec![recorded("log", ActionOutput::from("from entry"))],
            vec![recorded("bye", ActionOutput::none())],
        );

        let found = result.find("log").unwrap();
        assert_eq!(found.output.as_ready(), Some(&json!("from actions")));
        assert_eq!(result.iter().count(), 3);
    }

    #[tokio::test]
    async fn wait_resolves_pending_output() {
        let result = DispatchResult::new(
            vec![recorded(
                "fetch",
                ActionOutput::pending(async {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    json!("async function done")
                }),
            )],
            Vec::new(),
            Vec::new(),
        );

        assert_eq!(result.wait("fetch").await, Some(json!("async function done")));
        assert_eq!(result.wait("missing").await, None);
    }

    #[tokio::test]
    async fn wait_all_keeps_order() {
        let result = DispatchResult::new(
            vec![
                recorded("a", ActionOutput::from("one")),
                recorded("b", ActionOutput::pending(async { json!(2) })),
            ],
            vec![recorded("c", ActionOutput::none())],
            vec![recorded("d", ActionOutput::from(true))],
        );

        assert_eq!(
            result.wait_all().await,
            vec![json!("one"), json!(2), Value::Null, json!(true)]
        );
    }

    #[tokio::test]
    async fn pending_output_runs_only_when_awaited() {
        let started = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&started);
        let result = DispatchResult::new(
            vec![recorded(
                "work",
                ActionOutput::pending(async move {
                    flag.store(true, Ordering::SeqCst);
                    Value::Null
                }),
            )],
            Vec::new(),
            Vec::new(),
        );

        tokio::task::yield_now().await;
        assert!(!started.load(Ordering::SeqCst));

        result.wait("work").await;
        assert!(started.load(Ordering::SeqCst));
    }
}
