//! MemTable Module
//!
//! In-memory storage engine.
//!
//! ## Responsibilities
//! - Fast reads and writes in memory
//! - Single-writer/multi-reader access pattern
//! - Track size for `Store::size`
//! - Ordered key iteration
//!
//! ## Data Structure Choice
//! BTreeMap wrapped in RwLock:
//! - Ordered keys, so `get_all_keys` is deterministic
//! - Values keep their runtime type; reading a key as the wrong type
//!   yields nothing rather than a reinterpretation of the bytes

mod table;

pub use table::MemoryEngine;
