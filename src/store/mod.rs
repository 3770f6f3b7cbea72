//! Store Module
//!
//! The binding glue between runtime calls and the storage engine.
//!
//! ## Call Flow
//! ```text
//!   runtime call ──► TextHandle (key, zero-copy when possible)
//!                          │
//!                          ▼
//!                    StorageEngine ──► NativeBuffer (owned) ──► runtime
//!                          │
//!                   (mutations only)
//!                          ▼
//!                  ListenerRegistry::notify(instance id, key)
//! ```
//!
//! `StoreFactory` owns the shared `ListenerRegistry` and one engine per
//! instance id; every `Store` it hands out borrows both through `Arc`s.

mod factory;
mod instance;

pub use factory::StoreFactory;
pub use instance::{ListenerHandle, Store};
