//! # kvbridge
//!
//! Value marshaling and change notification between a dynamically typed
//! scripting runtime and a native key-value store:
//! - UTF-16 → UTF-8 transcoding with an 8-lane block fast path
//! - Zero-copy text handles over runtime strings, promoted on demand
//! - Buffer adapters with explicit owning / borrowing semantics
//! - A listener registry fanning out per-key change events
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Runtime (native call)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ string / buffer arguments
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │        TextHandle (via Transcoder)   NativeBuffer           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Store (glue)                            │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │ mutations
//!            ▼                                  ▼
//!   ┌─────────────────┐               ┌──────────────────┐
//!   │  StorageEngine  │               │ ListenerRegistry │
//!   │ (external/mem)  │               │   (fan-out)      │
//!   └─────────────────┘               └──────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod transcode;
pub mod text;
pub mod host;
pub mod buffer;
pub mod registry;

pub mod value;
pub mod engine;
pub mod memtable;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BridgeError, Result};
pub use config::{EncryptionType, StoreConfig, StoreMode};
pub use text::{Chunk, ExternalString, TextHandle};
pub use host::{HostChunk, HostString};
pub use buffer::NativeBuffer;
pub use registry::{ListenerId, ListenerRegistry};
pub use value::{StoredValue, Value};
pub use engine::StorageEngine;
pub use memtable::MemoryEngine;
pub use store::{ListenerHandle, Store, StoreFactory};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvbridge
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
