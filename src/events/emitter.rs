//! Publish/subscribe primitive shared by the container and its children.
//!
//! Dispatch is synchronous: `trigger` invokes every matching listener before
//! it returns, and a listener is free to subscribe, unsubscribe, or trigger
//! again while it runs. The listener list is snapshotted per emission, so
//! nested mutation never invalidates the iteration in flight. Recursion is
//! bounded by whoever wires the relays (see [`BubbleGuard`](super::BubbleGuard)).

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

// =============================================================================
// Types
// =============================================================================

/// An emitted event: name plus optional JSON payload.
#[derive(Clone, Debug)]
pub struct Event {
    pub name: String,
    pub data: Option<Value>,
}

impl Event {
    pub fn new(name: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Token returned by [`EventEmitter::on`], usable with [`EventEmitter::off`].
pub type ListenerId = usize;

type Listener = Rc<dyn Fn(&Event)>;

// =============================================================================
// Emitter
// =============================================================================

/// Per-object event registry.
///
/// Confined to one thread; interior mutability keeps subscription usable
/// through shared references, which is how listeners reach their own emitter
/// during dispatch.
#[derive(Default)]
pub struct EventEmitter {
    listeners: RefCell<HashMap<String, Vec<(ListenerId, Listener)>>>,
    next_id: Cell<ListenerId>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to an event by name. Listeners fire in subscription order.
    pub fn on(&self, name: impl Into<String>, listener: impl Fn(&Event) + 'static) -> ListenerId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners
            .borrow_mut()
            .entry(name.into())
            .or_default()
            .push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns whether anything was removed.
    pub fn off(&self, name: &str, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(entries) = listeners.get_mut(name) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Emit an event to every listener registered under its name.
    pub fn trigger(&self, name: &str, data: Option<Value>) {
        // Snapshot before invoking: listeners may mutate the registry.
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .get(name)
            .map(|entries| entries.iter().map(|(_, l)| Rc::clone(l)).collect())
            .unwrap_or_default();

        let event = Event::new(name, data);
        for listener in snapshot {
            listener(&event);
        }
    }

    /// Number of listeners currently registered for an event.
    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners
            .borrow()
            .get(name)
            .map_or(0, |entries| entries.len())
    }
}

// =============================================================================
// Tests
// =============================================================================
