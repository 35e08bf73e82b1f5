//! Persistent catalog store.
//!
//! The catalog is stored as one JSON array under a single key. Only metadata is
//! written; payload bytes never reach the store.

use std::sync::Arc;

use async_trait::async_trait;
use ktp_core::{AppError, FileMetadata};
use thiserror::Error;

use crate::traits::{KeyValueStore, StorageError};

/// Catalog store errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("Catalog '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize catalog '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write catalog '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: StorageError,
    },
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Read { .. } | CatalogError::Corrupt { .. } => {
                AppError::StoreRead(err.to_string())
            }
            CatalogError::Serialize { .. } | CatalogError::Write { .. } => {
                AppError::StoreWrite(err.to_string())
            }
        }
    }
}

/// Durable storage of the ordered catalog metadata.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Load the stored catalog in insertion order.
    ///
    /// Never fails: missing or unreadable data yields an empty catalog.
    async fn load(&self) -> Vec<FileMetadata>;

    /// Replace the stored catalog with `catalog`.
    async fn save(&self, catalog: &[FileMetadata]) -> Result<(), CatalogError>;
}

/// [`CatalogStore`] over a [`KeyValueStore`], bound to one catalog key.
#[derive(Clone)]
pub struct KeyValueCatalogStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl KeyValueCatalogStore {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        KeyValueCatalogStore {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the catalog, reporting why it could not be read.
    pub async fn try_load(&self) -> Result<Vec<FileMetadata>, CatalogError> {
        let raw = self
            .store
            .get(&self.key)
            .await
            .map_err(|source| CatalogError::Read {
                key: self.key.clone(),
                source,
            })?;

        let Some(raw) = raw else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&raw).map_err(|source| CatalogError::Corrupt {
            key: self.key.clone(),
            source,
        })
    }
}

#[async_trait]
impl CatalogStore for KeyValueCatalogStore {
    async fn load(&self) -> Vec<FileMetadata> {
        match self.try_load().await {
            Ok(catalog) => {
                tracing::debug!(key = %self.key, records = catalog.len(), "Catalog loaded");
                catalog
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    key = %self.key,
                    "Catalog unreadable, starting with an empty catalog"
                );
                Vec::new()
            }
        }
    }

    async fn save(&self, catalog: &[FileMetadata]) -> Result<(), CatalogError> {
        let start = std::time::Instant::now();

        let raw = serde_json::to_string(catalog).map_err(|source| CatalogError::Serialize {
            key: self.key.clone(),
            source,
        })?;

        self.store
            .set(&self.key, &raw)
            .await
            .map_err(|source| CatalogError::Write {
                key: self.key.clone(),
                source,
            })?;

        tracing::info!(
            key = %self.key,
            records = catalog.len(),
            size_bytes = raw.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Catalog saved"
        );

        Ok(())
    }
}
