//! Configuration for store instances
//!
//! Mirrors the configuration object the runtime passes when it opens a
//! store. The binding glue has already converted it to native types by the
//! time it gets here; `validate` enforces the constraints the storage
//! engine would otherwise reject.

use std::path::PathBuf;

use crate::error::{BridgeError, Result};

/// Identifier used when the caller does not name its instance
pub const DEFAULT_INSTANCE_ID: &str = "mmkv.default";

/// Configuration for a single store instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    // -------------------------------------------------------------------------
    // Identity
    // -------------------------------------------------------------------------
    /// Instance identifier. Stores opened with the same id share data and
    /// change listeners.
    pub id: String,

    /// Custom root directory, forwarded to the storage engine untouched
    pub path: Option<PathBuf>,

    // -------------------------------------------------------------------------
    // Access
    // -------------------------------------------------------------------------
    /// Encryption key (at most 16 bytes for AES-128, 32 for AES-256)
    pub encryption_key: Option<String>,

    /// Cipher used when an encryption key is set
    pub encryption_type: EncryptionType,

    /// Process sharing mode
    pub mode: StoreMode,

    /// Reject every mutating operation
    pub read_only: bool,
}

/// Process sharing mode of a store instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreMode {
    /// Only this process opens the instance
    #[default]
    SingleProcess,

    /// Several processes may open the instance concurrently
    MultiProcess,
}

/// Cipher used to encrypt a store instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncryptionType {
    #[default]
    Aes128,
    Aes256,
}

impl EncryptionType {
    /// Longest key the cipher accepts, in bytes
    pub fn max_key_len(self) -> usize {
        match self {
            EncryptionType::Aes128 => 16,
            EncryptionType::Aes256 => 32,
        }
    }

    /// Reject keys longer than `max_key_len`
    pub fn check_key(self, key: &str) -> Result<()> {
        let max = self.max_key_len();
        if key.len() > max {
            return Err(BridgeError::EncryptionKeyTooLong { len: key.len(), max });
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_INSTANCE_ID.to_string(),
            path: None,
            encryption_key: None,
            encryption_type: EncryptionType::Aes128,
            mode: StoreMode::SingleProcess,
            read_only: false,
        }
    }
}

impl StoreConfig {
    /// Create a new config builder
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Check the config against the storage engine's constraints
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(BridgeError::InvalidConfig("`id` cannot be empty".to_string()));
        }

        if let Some(key) = &self.encryption_key {
            self.encryption_type.check_key(key)?;
        }

        Ok(())
    }

    /// Whether an encryption key is configured
    pub fn is_encrypted(&self) -> bool {
        self.encryption_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Builder for StoreConfig
#[derive(Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Set the instance id
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.config.id = id.into();
        self
    }

    /// Set the root directory
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = Some(path.into());
        self
    }

    /// Set the encryption key
    pub fn encryption_key(mut self, key: impl Into<String>) -> Self {
        self.config.encryption_key = Some(key.into());
        self
    }

    /// Set the cipher
    pub fn encryption_type(mut self, encryption_type: EncryptionType) -> Self {
        self.config.encryption_type = encryption_type;
        self
    }

    /// Set the process sharing mode
    pub fn mode(mut self, mode: StoreMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Open the instance read-only
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.config.read_only = read_only;
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}
