//! MemoryEngine implementation
//!
//! BTreeMap-based engine with RwLock for concurrency.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::config::EncryptionType;
use crate::engine::StorageEngine;
use crate::value::StoredValue;

/// In-memory engine for one store instance
///
/// ## Concurrency:
/// - `data`: RwLock (many concurrent readers, exclusive writer)
/// - `size`: only written with the `data` write lock held, readable lock-free
pub struct MemoryEngine {
    /// Entries, sorted by key
    data: RwLock<BTreeMap<Vec<u8>, StoredValue>>,

    /// Sum of key and value sizes in bytes
    size: AtomicUsize,

    /// Current key and cipher (kept for bookkeeping only, nothing is encrypted)
    encryption: Mutex<Option<(String, EncryptionType)>>,
}

impl MemoryEngine {
    /// Create a new empty engine
    pub fn new() -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
            size: AtomicUsize::new(0),
            encryption: Mutex::new(None),
        }
    }

    /// Create an engine that starts out encrypted with `key`
    pub fn with_encryption_key(key: impl Into<String>, encryption_type: EncryptionType) -> Self {
        let engine = Self::new();
        *engine.encryption.lock() = Some((key.into(), encryption_type));
        engine
    }

    /// Get approximate size in bytes
    pub fn size(&self) -> usize {
        self.size.load(Ordering::Acquire)
    }

    pub fn entry_count(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    pub fn is_encrypted(&self) -> bool {
        self.encryption.lock().is_some()
    }

    /// Cipher in use, `None` when unencrypted
    pub fn encryption_type(&self) -> Option<EncryptionType> {
        self.encryption.lock().as_ref().map(|(_, encryption_type)| *encryption_type)
    }

    /// Snapshot of all entries in key order
    pub fn entries(&self) -> Vec<(Vec<u8>, StoredValue)> {
        self.data
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Insert and return the new total size
    pub fn insert(&self, key: Vec<u8>, value: StoredValue) -> usize {
        let mut data = self.data.write();
        let added = key.len() + value.encoded_len();
        let key_len = key.len();

        let removed = match data.insert(key, value) {
            Some(old) => key_len + old.encoded_len(),
            None => 0,
        };

        let new_size = self.size.load(Ordering::Acquire) + added - removed;
        self.size.store(new_size, Ordering::Release);
        new_size
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageEngine for MemoryEngine {
    fn get(&self, key: &[u8]) -> Option<StoredValue> {
        self.data.read().get(key).cloned()
    }

    fn put(&self, key: Vec<u8>, value: StoredValue) {
        self.insert(key, value);
    }

    fn remove(&self, key: &[u8]) -> bool {
        let mut data = self.data.write();
        match data.remove(key) {
            Some(old) => {
                let freed = key.len() + old.encoded_len();
                let current = self.size.load(Ordering::Acquire);
                self.size.store(current - freed, Ordering::Release);
                true
            }
            None => false,
        }
    }

    fn contains(&self, key: &[u8]) -> bool {
        self.data.read().contains_key(key)
    }

    fn keys(&self) -> Vec<Vec<u8>> {
        self.data.read().keys().cloned().collect()
    }

    fn clear(&self) -> Vec<Vec<u8>> {
        let mut data = self.data.write();
        let cleared = std::mem::take(&mut *data);
        self.size.store(0, Ordering::Release);
        cleared.into_keys().collect()
    }

    fn size(&self) -> usize {
        MemoryEngine::size(self)
    }

    fn trim(&self) {
        tracing::trace!(size = self.size(), "trim is a no-op for in-memory engines");
    }

    fn recrypt(&self, key: Option<&str>, encryption_type: EncryptionType) {
        *self.encryption.lock() = key.map(|key| (key.to_string(), encryption_type));
    }
}
