//! Storage Engine Seam
//!
//! The persistent key-value engine is an external collaborator: it owns
//! the on-disk format, encryption, memory mapping and durability. This
//! trait is the narrow surface the store glue needs from it.
//!
//! `MemoryEngine` (see `memtable`) is the in-process implementation used
//! when no native engine is linked, and in tests.

use crate::config::EncryptionType;
use crate::value::StoredValue;

/// Operations the store glue performs on one engine instance
///
/// All methods take `&self`; implementations synchronize internally so a
/// single instance can be shared by every `Store` opened with its id.
pub trait StorageEngine: Send + Sync {
    /// Look up `key`
    fn get(&self, key: &[u8]) -> Option<StoredValue>;

    /// Insert or overwrite `key`
    fn put(&self, key: Vec<u8>, value: StoredValue);

    /// Remove `key`, returning whether it existed
    fn remove(&self, key: &[u8]) -> bool;

    fn contains(&self, key: &[u8]) -> bool;

    /// All keys, in the engine's iteration order
    fn keys(&self) -> Vec<Vec<u8>>;

    /// Remove everything, returning the keys that were present
    fn clear(&self) -> Vec<Vec<u8>>;

    /// Total storage size in bytes
    fn size(&self) -> usize;

    /// Release unused space
    fn trim(&self);

    /// Re-encrypt with `key` using `encryption_type`, or remove encryption
    /// when `None`
    fn recrypt(&self, key: Option<&str>, encryption_type: EncryptionType);
}
