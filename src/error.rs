//! Error types for kvbridge
//!
//! Only the store glue can fail. The transcoder, text handle, buffer adapter
//! and listener registry have no error paths: malformed UTF-16 decodes to
//! U+FFFD and removing an unknown listener is a no-op.

use thiserror::Error;

/// Result type alias using BridgeError
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Unified error type for store operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("Cannot set a value for an empty key")]
    EmptyKey,

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Store instance \"{id}\" is read-only")]
    ReadOnly { id: String },

    #[error("Store instance not found: {0}")]
    InstanceNotFound(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("Encryption key cannot be longer than {max} bytes (got {len})")]
    EncryptionKeyTooLong { len: usize, max: usize },
}
