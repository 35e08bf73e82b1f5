//! Key-value storage abstraction trait
//!
//! This module defines the KeyValueStore trait that all storage backends must implement.

use crate::CatalogBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Client-local key-value storage.
///
/// Values are whole strings; `set` replaces the previous value so that readers see
/// either the old or the new value, never a mix. There is no cross-process
/// coordination: concurrent writers to the same key resolve last-write-wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> CatalogBackend;
}
