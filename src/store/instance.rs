//! Store instance
//!
//! One handle onto a store instance, as exposed to the runtime.

use std::borrow::Cow;
use std::sync::Arc;

use crate::buffer::NativeBuffer;
use crate::config::StoreConfig;
use crate::engine::StorageEngine;
use crate::error::{BridgeError, Result};
use crate::registry::{ListenerId, ListenerRegistry};
use crate::value::{StoredValue, Value};

/// A store instance handle
///
/// Handles opened with the same id share the engine and the listeners.
pub struct Store {
    /// Configuration the instance was opened with
    config: StoreConfig,

    /// Backing engine (shared with other handles of the same id)
    engine: Arc<dyn StorageEngine>,

    /// Process-wide listener registry
    registry: Arc<ListenerRegistry>,
}

impl Store {
    /// Wrap an engine. `config` is validated first.
    pub fn with_engine(
        config: StoreConfig,
        engine: Arc<dyn StorageEngine>,
        registry: Arc<ListenerRegistry>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            engine,
            registry,
        })
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Set `value` for `key` and notify listeners
    ///
    /// String and buffer values are copied into the engine, so the caller's
    /// view or borrowed buffer only needs to live for this call.
    pub fn set<'a>(&self, key: impl AsRef<[u8]>, value: impl Into<Value<'a>>) -> Result<()> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(BridgeError::EmptyKey);
        }
        self.ensure_writable()?;

        let value = value.into();
        tracing::trace!(instance = %self.config.id, value_type = value.type_name(), "set");

        self.engine.put(key.to_vec(), value.into_stored());
        self.notify(key);
        Ok(())
    }

    /// Remove `key`. Listeners are notified only if the key existed.
    pub fn remove(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        let key = key.as_ref();
        self.ensure_writable()?;

        let removed = self.engine.remove(key);
        if removed {
            self.notify(key);
        }
        Ok(removed)
    }

    /// Remove every key, notifying listeners once per cleared key
    pub fn clear_all(&self) -> Result<()> {
        self.ensure_writable()?;

        let cleared = self.engine.clear();
        tracing::debug!(instance = %self.config.id, keys = cleared.len(), "cleared all keys");

        for key in &cleared {
            self.notify(key);
        }
        Ok(())
    }

    /// Change (or with `None`, remove) the encryption key.
    ///
    /// The key is checked against the cipher the instance was opened with.
    pub fn recrypt(&self, key: Option<&str>) -> Result<()> {
        self.ensure_writable()?;

        let encryption_type = self.config.encryption_type;
        if let Some(key) = key {
            encryption_type.check_key(key)?;
        }

        self.engine.recrypt(key.filter(|k| !k.is_empty()), encryption_type);
        tracing::info!(
            instance = %self.config.id,
            encrypted = key.is_some_and(|k| !k.is_empty()),
            encryption_type = ?encryption_type,
            "recrypted store"
        );
        Ok(())
    }

    /// Release unused space in the engine
    pub fn trim(&self) {
        self.engine.trim();
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn get_boolean(&self, key: impl AsRef<[u8]>) -> Option<bool> {
        self.engine.get(key.as_ref())?.as_bool()
    }

    pub fn get_number(&self, key: impl AsRef<[u8]>) -> Option<f64> {
        self.engine.get(key.as_ref())?.as_number()
    }

    pub fn get_string(&self, key: impl AsRef<[u8]>) -> Option<String> {
        match self.engine.get(key.as_ref())? {
            StoredValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Read a buffer value as an owning adapter the runtime may keep
    pub fn get_buffer(&self, key: impl AsRef<[u8]>) -> Option<NativeBuffer<'static>> {
        match self.engine.get(key.as_ref())? {
            StoredValue::Buffer(bytes) => Some(NativeBuffer::copy_from_slice(&bytes)),
            _ => None,
        }
    }

    pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
        self.engine.contains(key.as_ref())
    }

    pub fn get_all_keys(&self) -> Vec<String> {
        self.engine
            .keys()
            .into_iter()
            .map(|k| match String::from_utf8(k) {
                Ok(s) => s,
                Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
            })
            .collect()
    }

    /// Total storage size in bytes
    pub fn size(&self) -> usize {
        self.engine.size()
    }

    pub fn is_read_only(&self) -> bool {
        self.config.read_only
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Call `callback` with the key whenever a value of this instance changes
    pub fn add_on_value_changed_listener<F>(&self, callback: F) -> ListenerHandle
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let id = self.registry.add_listener(&self.config.id, callback);
        ListenerHandle {
            registry: Arc::clone(&self.registry),
            instance_id: self.config.id.clone(),
            id,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Instance id
    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Whether `other` refers to the same instance
    pub fn same_instance(&self, other: &Store) -> bool {
        self.config.id == other.config.id && Arc::ptr_eq(&self.engine, &other.engine)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_writable(&self) -> Result<()> {
        if self.config.read_only {
            return Err(BridgeError::ReadOnly {
                id: self.config.id.clone(),
            });
        }
        Ok(())
    }

    fn notify(&self, key: &[u8]) {
        let key: Cow<'_, str> = String::from_utf8_lossy(key);
        self.registry.notify(&self.config.id, &key);
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.config.id)
            .field("read_only", &self.config.read_only)
            .field("size", &self.size())
            .finish()
    }
}

/// Subscription returned by `Store::add_on_value_changed_listener`
///
/// Dropping the handle keeps the listener registered; call `remove`.
#[derive(Debug, Clone)]
pub struct ListenerHandle {
    registry: Arc<ListenerRegistry>,
    instance_id: String,
    id: ListenerId,
}

impl ListenerHandle {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Unsubscribe. Calling it again is a no-op.
    pub fn remove(&self) {
        self.registry.remove_listener(&self.instance_id, self.id);
    }
}
