//! Store factory
//!
//! Creates store handles and owns the state they share: one engine per
//! instance id and the listener registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::StoreConfig;
use crate::engine::StorageEngine;
use crate::error::{BridgeError, Result};
use crate::memtable::MemoryEngine;
use crate::registry::ListenerRegistry;

use super::Store;

/// Opens store instances backed by in-memory engines
///
/// Create one factory per process (or per runtime) and hand it to every
/// call site that opens stores; the registry lives exactly as long as the
/// factory and whatever stores it produced.
pub struct StoreFactory {
    /// Engines by instance id
    engines: Mutex<HashMap<String, Arc<MemoryEngine>>>,

    /// Shared by every store this factory creates
    registry: Arc<ListenerRegistry>,
}

impl StoreFactory {
    pub fn new() -> Self {
        Self::with_registry(Arc::new(ListenerRegistry::new()))
    }

    /// Use an existing registry, e.g. one shared with stores on other engines
    pub fn with_registry(registry: Arc<ListenerRegistry>) -> Self {
        Self {
            engines: Mutex::new(HashMap::new()),
            registry,
        }
    }

    /// Open (or create) the instance described by `config`
    pub fn create(&self, config: StoreConfig) -> Result<Store> {
        config.validate()?;

        let engine = {
            let mut engines = self.engines.lock();
            match engines.get(&config.id) {
                Some(engine) => Arc::clone(engine),
                None => {
                    tracing::info!(
                        instance = %config.id,
                        path = ?config.path,
                        encrypted = config.is_encrypted(),
                        encryption_type = ?config.encryption_type,
                        mode = ?config.mode,
                        "creating store instance"
                    );
                    let engine = match config.encryption_key.as_deref() {
                        Some(key) if !key.is_empty() => {
                            MemoryEngine::with_encryption_key(key, config.encryption_type)
                        }
                        _ => MemoryEngine::new(),
                    };
                    let engine = Arc::new(engine);
                    engines.insert(config.id.clone(), Arc::clone(&engine));
                    engine
                }
            }
        };

        let engine: Arc<dyn StorageEngine> = engine;
        Store::with_engine(config, engine, Arc::clone(&self.registry))
    }

    /// Open the default instance
    pub fn default_store(&self) -> Result<Store> {
        self.create(StoreConfig::default())
    }

    /// Whether an instance with `id` has been created and not deleted
    pub fn exists(&self, id: &str) -> bool {
        self.engines.lock().contains_key(id)
    }

    /// Drop the instance `id`. Handles that are still open keep their data
    /// but are detached from the factory.
    pub fn delete(&self, id: &str) -> bool {
        let removed = self.engines.lock().remove(id).is_some();
        if removed {
            tracing::info!(instance = id, "deleted store instance");
        }
        removed
    }

    /// Like `delete`, but reports a missing instance as an error
    pub fn try_delete(&self, id: &str) -> Result<()> {
        if self.delete(id) {
            Ok(())
        } else {
            Err(BridgeError::InstanceNotFound(id.to_string()))
        }
    }

    /// Ids of all live instances, sorted
    pub fn instance_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.engines.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn registry(&self) -> &Arc<ListenerRegistry> {
        &self.registry
    }
}

impl Default for StoreFactory {
    fn default() -> Self {
        Self::new()
    }
}
