//! Change Listener Registry
//!
//! Fans out per-key change events to listeners of a store instance.
//! Listeners are tracked across store handles, so every `Store` opened for
//! the same instance id shares one list.
//!
//! ## Concurrency
//! - `next_id`: atomic counter, ids are never reused
//! - `listeners`: one mutex over the whole map, held only to read or
//!   modify it
//! - Per-instance lists are copy-on-write (`Arc<Vec<_>>`). `notify` clones
//!   the `Arc` under the lock and calls back after releasing it, so a
//!   callback may add or remove listeners without deadlocking.
//!
//! A fan-out delivers to every listener present when it took its snapshot,
//! even if one of them is removed on another thread meanwhile. Removal only
//! affects `notify` calls that start after `remove_listener` returned.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Callback invoked with the key that changed
pub type ListenerCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Process-unique subscription id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone)]
struct Subscription {
    id: ListenerId,
    callback: ListenerCallback,
}

/// Instance id → subscriptions, in registration order
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Mutex<HashMap<String, Arc<Vec<Subscription>>>>,
    next_id: AtomicU64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for changes on `instance_id`
    pub fn add_listener<F>(&self, instance_id: &str, callback: F) -> ListenerId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let subscription = Subscription {
            id,
            callback: Arc::new(callback),
        };

        let mut listeners = self.listeners.lock();
        let list = listeners.entry(instance_id.to_string()).or_default();
        Arc::make_mut(list).push(subscription);

        tracing::debug!(instance = instance_id, listener = %id, "added value-changed listener");
        id
    }

    /// Unregister `id`. Returns `false` (and does nothing) if it is unknown.
    pub fn remove_listener(&self, instance_id: &str, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let Some(list) = listeners.get_mut(instance_id) else {
            return false;
        };
        let Some(index) = list.iter().position(|s| s.id == id) else {
            return false;
        };

        Arc::make_mut(list).remove(index);

        if list.is_empty() {
            listeners.remove(instance_id);
        }

        tracing::debug!(instance = instance_id, listener = %id, "removed value-changed listener");
        true
    }

    /// Call every listener of `instance_id` with `key`, in registration order.
    ///
    /// Runs synchronously on the calling thread. A panicking callback
    /// propagates to the caller and stops the fan-out.
    pub fn notify(&self, instance_id: &str, key: &str) {
        let snapshot = {
            let listeners = self.listeners.lock();
            match listeners.get(instance_id) {
                Some(list) => Arc::clone(list),
                None => return,
            }
        };

        tracing::trace!(instance = instance_id, key, listeners = snapshot.len(), "notifying");

        for subscription in snapshot.iter() {
            (subscription.callback)(key);
        }
    }

    /// Number of listeners currently registered for `instance_id`
    pub fn listener_count(&self, instance_id: &str) -> usize {
        self.listeners
            .lock()
            .get(instance_id)
            .map_or(0, |list| list.len())
    }

    /// Number of instances with at least one listener
    pub fn instance_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("instances", &self.instance_count())
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish()
    }
}
