//! Provider event emitter.
//!
//! Listeners are registered per event kind and invoked synchronously, in
//! registration order, by whichever provider call triggered the event. The
//! listener list is snapshotted before dispatch, so a listener may register
//! or remove listeners without deadlocking.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;

/// The kinds of event a provider emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Connect,
    Disconnect,
    ChainChanged,
    AccountChanged,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Connect => "connect",
            EventKind::Disconnect => "disconnect",
            EventKind::ChainChanged => "chainChanged",
            EventKind::AccountChanged => "accountChanged",
        }
    }
}

/// An event and its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// Connected; carries the account address.
    Connect(String),
    Disconnect,
    /// Active chain changed; carries the new chain id.
    ChainChanged(String),
    /// Active account changed; carries the new address.
    AccountChanged(String),
}

impl ProviderEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ProviderEvent::Connect(_) => EventKind::Connect,
            ProviderEvent::Disconnect => EventKind::Disconnect,
            ProviderEvent::ChainChanged(_) => EventKind::ChainChanged,
            ProviderEvent::AccountChanged(_) => EventKind::AccountChanged,
        }
    }
}

pub type Listener = Arc<dyn Fn(&ProviderEvent) + Send + Sync>;

/// Handle returned by [`EventEmitter::on`], used to remove the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: HashMap<EventKind, Vec<(ListenerId, Listener)>>,
}

#[derive(Default)]
pub struct EventEmitter {
    registry: Mutex<Registry>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means a listener panicked mid-registration; the
    // registry itself is still consistent.
    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register `listener` for events of `kind`.
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&ProviderEvent) + Send + Sync + 'static,
    {
        self.add_listener(kind, Arc::new(listener))
    }

    /// Register an already shared listener.
    pub fn add_listener(&self, kind: EventKind, listener: Listener) -> ListenerId {
        let mut registry = self.registry();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry
            .listeners
            .entry(kind)
            .or_default()
            .push((id, listener));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut registry = self.registry();
        for list in registry.listeners.values_mut() {
            if let Some(pos) = list.iter().position(|(lid, _)| *lid == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.registry().listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Deliver `event` to every listener registered for its kind.
    pub fn emit(&self, event: ProviderEvent) {
        let listeners: Vec<Listener> = self
            .registry()
            .listeners
            .get(&event.kind())
            .map(|list| list.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default();

        trace!(event = event.kind().as_str(), listeners = listeners.len(), "emitting");
        for listener in listeners {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry();
        let counts: HashMap<&'static str, usize> = registry
            .listeners
            .iter()
            .map(|(k, v)| (k.as_str(), v.len()))
            .collect();
        f.debug_struct("EventEmitter").field("listeners", &counts).finish()
    }
}
