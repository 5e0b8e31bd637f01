//! Session notifications and scoped listener registration.
//!
//! Every chat session owns an [`EventHub`]. Callers register interest in
//! one [`EventKind`] at a time and get back a [`Subscription`], which
//! receives matching events until it is dropped or explicitly
//! unsubscribed. Dropping the guard is the only way a listener leaves
//! the hub, so a turn that returns early cannot leak listeners into the
//! next one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use strum::Display;
use tokio::sync::mpsc;
use tracing::{debug, instrument, trace};

/// Kind of notification a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    /// Incremental assistant output.
    AssistantMessage,
    /// The session finished producing output for the current turn.
    Idle,
    /// The session failed while producing output.
    Error,
}

/// A notification published by a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A fragment of the assistant's reply. Some fragments carry no text.
    AssistantMessage {
        /// Text payload, if any.
        content: Option<String>,
    },
    /// The turn is complete.
    Idle,
    /// The turn failed after dispatch.
    Error {
        /// What went wrong.
        message: String,
    },
}

impl SessionEvent {
    /// Builds a text fragment event.
    pub fn fragment(text: impl Into<String>) -> Self {
        Self::AssistantMessage {
            content: Some(text.into()),
        }
    }

    /// Returns the kind used to route this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::AssistantMessage { .. } => EventKind::AssistantMessage,
            Self::Idle => EventKind::Idle,
            Self::Error { .. } => EventKind::Error,
        }
    }

    /// Returns the text payload of an assistant fragment.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::AssistantMessage { content } => content.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Listener {
    kind: EventKind,
    tx: mpsc::UnboundedSender<SessionEvent>,
}

#[derive(Debug, Default)]
struct HubInner {
    next_id: u64,
    listeners: HashMap<u64, Listener>,
}

/// Per-session listener registry.
///
/// Cloning the hub shares the registry, so the streaming task and the
/// session handle publish to the same listeners.
#[derive(Debug, Clone, Default)]
pub struct EventHub {
    inner: Arc<Mutex<HubInner>>,
}

impl EventHub {
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a listener for `kind`.
    #[instrument(skip(self))]
    pub fn subscribe(&self, kind: EventKind) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.insert(id, Listener { kind, tx });
        debug!(id, %kind, listeners = inner.listeners.len(), "Subscribed");
        Subscription {
            id,
            kind,
            hub: self.clone(),
            rx,
        }
    }

    /// Delivers `event` to every listener of its kind.
    ///
    /// Returns the number of listeners that received it.
    pub fn publish(&self, event: SessionEvent) -> usize {
        let kind = event.kind();
        let inner = self.lock();
        let mut delivered = 0;
        for listener in inner.listeners.values().filter(|l| l.kind == kind) {
            if listener.tx.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        trace!(%kind, delivered, "Published event");
        delivered
    }

    /// Number of live listeners across all kinds.
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Drops every listener. Pending receivers see their stream end.
    #[instrument(skip(self))]
    pub fn close(&self) {
        let mut inner = self.lock();
        debug!(listeners = inner.listeners.len(), "Closing event hub");
        inner.listeners.clear();
    }

    fn remove(&self, id: u64) {
        let mut inner = self.lock();
        if inner.listeners.remove(&id).is_some() {
            debug!(id, listeners = inner.listeners.len(), "Unsubscribed");
        }
    }
}

/// A live listener registration. Unsubscribes on drop.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    kind: EventKind,
    hub: EventHub,
    rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl Subscription {
    /// The kind of event this subscription receives.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Waits for the next event. Returns `None` once the hub drops this
    /// listener.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }

    /// Takes an already-delivered event without waiting.
    pub fn try_recv(&mut self) -> Option<SessionEvent> {
        self.rx.try_recv().ok()
    }

    /// Removes this listener from the hub.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.remove(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_routes_by_kind() {
        let hub = EventHub::new();
        let mut messages = hub.subscribe(EventKind::AssistantMessage);
        let mut idle = hub.subscribe(EventKind::Idle);

        assert_eq!(hub.publish(SessionEvent::fragment("hi")), 1);
        assert_eq!(hub.publish(SessionEvent::Idle), 1);

        assert_eq!(messages.try_recv(), Some(SessionEvent::fragment("hi")));
        assert_eq!(messages.try_recv(), None);
        assert_eq!(idle.recv().await, Some(SessionEvent::Idle));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let hub = EventHub::new();
        let first = hub.subscribe(EventKind::Idle);
        let second = hub.subscribe(EventKind::Error);
        assert_eq!(hub.listener_count(), 2);

        drop(first);
        assert_eq!(hub.listener_count(), 1);

        second.unsubscribe();
        assert_eq!(hub.listener_count(), 0);
        assert_eq!(hub.publish(SessionEvent::Idle), 0);
    }

    #[tokio::test]
    async fn test_close_ends_streams() {
        let hub = EventHub::new();
        let mut idle = hub.subscribe(EventKind::Idle);
        hub.close();
        assert_eq!(hub.listener_count(), 0);
        assert_eq!(idle.recv().await, None);
    }
}
