//! Surface change notifications
//!
//! One concrete emitter, owned by the surface. Subscribers get back a
//! [`Subscription`] handle, the only way to remove their listener.

use serde::{Deserialize, Serialize};

/// Events emitted by a surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SurfaceEvent {
    /// Content differs from the last committed snapshot
    ContentChanged { content: String, previous: String },
}

impl SurfaceEvent {
    pub const CONTENT_CHANGED: &'static str = "content:changed";

    /// Event name as the view knows it
    pub fn name(&self) -> &'static str {
        match self {
            SurfaceEvent::ContentChanged { .. } => Self::CONTENT_CHANGED,
        }
    }
}

/// Capability handle returned by [`EventEmitter::subscribe`]
///
/// Not `Clone`: unsubscribing consumes it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u32);

impl Subscription {
    /// Raw id, for handing across the JS boundary
    pub fn id(&self) -> u32 {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn from_id(id: u32) -> Self {
        Subscription(id)
    }
}

type Listener = Box<dyn FnMut(&SurfaceEvent)>;

/// Listener registry; listeners fire in subscription order
#[derive(Default)]
pub struct EventEmitter {
    listeners: Vec<(u32, Listener)>,
    next_id: u32,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&SurfaceEvent) + 'static,
    {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.push((id, Box::new(listener)));
        Subscription(id)
    }

    /// Remove a listener; returns false if it was already gone
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription.0);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn emit(&mut self, event: &SurfaceEvent) {
        log::debug!("emitting {} to {} listener(s)", event.name(), self.listeners.len());
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn changed(content: &str, previous: &str) -> SurfaceEvent {
        SurfaceEvent::ContentChanged {
            content: content.to_string(),
            previous: previous.to_string(),
        }
    }

    #[test]
    fn test_listeners_fire_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = EventEmitter::new();

        let first = Rc::clone(&log);
        emitter.subscribe(move |e| first.borrow_mut().push(format!("first:{}", e.name())));
        let second = Rc::clone(&log);
        emitter.subscribe(move |_| second.borrow_mut().push("second".to_string()));

        emitter.emit(&changed("b", "a"));
        assert_eq!(*log.borrow(), vec!["first:content:changed", "second"]);
    }

    #[test]
    fn test_unsubscribe_removes_only_that_listener() {
        let count = Rc::new(RefCell::new(0));
        let mut emitter = EventEmitter::new();

        let a = Rc::clone(&count);
        let handle = emitter.subscribe(move |_| *a.borrow_mut() += 1);
        let b = Rc::clone(&count);
        emitter.subscribe(move |_| *b.borrow_mut() += 10);

        assert!(emitter.unsubscribe(handle));
        emitter.emit(&changed("b", "a"));
        assert_eq!(*count.borrow(), 10);
        assert_eq!(emitter.listener_count(), 1);
    }

    #[test]
    fn test_unsubscribe_unknown_handle() {
        let mut emitter = EventEmitter::new();
        assert!(!emitter.unsubscribe(Subscription::from_id(42)));
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let json = serde_json::to_string(&changed("new", "old")).unwrap();
        assert_eq!(json, r#"{"event":"contentChanged","content":"new","previous":"old"}"#);
    }
}
