use portal_scheduler_domain::ActivitySignal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::debug;

/// Callback invoked for every interaction signal published on the bus
pub type ActivityListener = Arc<dyn Fn(ActivitySignal) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Error, Debug, PartialEq)]
pub enum ActivityBusError {
    #[error("The activity bus is closed and accepts no more listeners")]
    Closed,
}

#[derive(Default)]
struct BusState {
    next_id: u64,
    closed: bool,
    listeners: HashMap<ListenerId, ActivityListener>,
}

/// Fan-out of user interaction signals (pointer, keyboard, scroll, touch)
/// coming from the host environment to whoever needs to observe them.
#[derive(Clone, Default)]
pub struct ActivityBus {
    state: Arc<Mutex<BusState>>,
}

impl ActivityBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn register(&self, listener: ActivityListener) -> Result<ListenerId, ActivityBusError> {
        let mut state = self.lock();
        if state.closed {
            return Err(ActivityBusError::Closed);
        }
        let id = ListenerId(state.next_id);
        state.next_id += 1;
        state.listeners.insert(id, listener);
        Ok(id)
    }

    /// Returns whether a listener was registered with the given id
    pub fn unregister(&self, id: ListenerId) -> bool {
        self.lock().listeners.remove(&id).is_some()
    }

    pub fn publish(&self, signal: ActivitySignal) {
        // Listeners are called outside of the lock so that they can
        // unregister themselves
        let listeners = self
            .lock()
            .listeners
            .values()
            .cloned()
            .collect::<Vec<_>>();
        debug!("{:?} published to {} listeners", signal, listeners.len());
        for listener in listeners {
            listener(signal);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Drops every listener and rejects later registrations
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.listeners.clear();
    }
}
