//! Publish/subscribe notifications for machine activity.

use crate::core::Event;
use std::fmt;

/// What a listener subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topic {
    /// An event was dispatched, before any handler runs.
    Event,
    /// The active-state pointer moved one hop.
    Transition,
}

/// A notification delivered to listeners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Notification<'a> {
    Event(&'a Event),
    Transition {
        next: &'a str,
        prev: Option<&'a str>,
    },
}

impl Notification<'_> {
    pub fn topic(&self) -> Topic {
        match self {
            Self::Event(_) => Topic::Event,
            Self::Transition { .. } => Topic::Transition,
        }
    }
}

/// Handle used to unsubscribe a listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&Notification<'_>) + Send>;

struct Listener {
    id: ListenerId,
    topic: Topic,
    once: bool,
    callback: Callback,
}

/// Listener registry. Listeners run synchronously, in subscription order.
#[derive(Default)]
pub struct Emitter {
    next_id: u64,
    listeners: Vec<Listener>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a topic.
    pub fn on<F>(&mut self, topic: Topic, callback: F) -> ListenerId
    where
        F: FnMut(&Notification<'_>) + Send + 'static,
    {
        self.subscribe(topic, false, Box::new(callback))
    }

    /// Subscribe for a single notification.
    pub fn once<F>(&mut self, topic: Topic, callback: F) -> ListenerId
    where
        F: FnMut(&Notification<'_>) + Send + 'static,
    {
        self.subscribe(topic, true, Box::new(callback))
    }

    /// Unsubscribe. Returns whether the listener was still registered.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.id != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, notification: &Notification<'_>) {
        let topic = notification.topic();
        self.listeners.retain_mut(|listener| {
            if listener.topic != topic {
                return true;
            }
            (listener.callback)(notification);
            !listener.once
        });
    }

    pub fn listener_count(&self, topic: Topic) -> usize {
        self.listeners.iter().filter(|l| l.topic == topic).count()
    }

    fn subscribe(&mut self, topic: Topic, once: bool, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            topic,
            once,
            callback,
        });
        id
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
