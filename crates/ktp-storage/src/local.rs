use crate::keys::{key_to_file_name, validate_key};
use crate::traits::{KeyValueStore, StorageError, StorageResult};
use crate::CatalogBackend;
use async_trait::async_trait;
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem key-value store: one file per key under a data directory.
#[derive(Clone, Debug)]
pub struct LocalKeyValueStore {
    base_path: PathBuf,
}

impl LocalKeyValueStore {
    /// Create a new LocalKeyValueStore instance
    ///
    /// # Arguments
    /// * `base_path` - Directory holding one file per key (e.g., "./.ktp")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalKeyValueStore { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(key_to_file_name(key)))
    }
}

#[async_trait]
impl KeyValueStore for LocalKeyValueStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.key_to_path(key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(None);
        }

        let value = fs::read_to_string(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            path = %path.display(),
            key = %key,
            size_bytes = value.len(),
            "Local store read"
        );

        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        let size = value.len();
        let start = std::time::Instant::now();

        // The temp file is renamed over the target on commit; a failed write leaves
        // the previous value in place.
        let target = path.clone();
        let data = value.as_bytes().to_vec();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut file = AtomicWriteFile::options().open(&target)?;
            file.write_all(&data)?;
            file.commit()
        })
        .await
        .map_err(|e| StorageError::WriteFailed(format!("Write task failed: {}", e)))?
        .map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local store write successful"
        );

        Ok(())
    }

    fn backend_type(&self) -> CatalogBackend {
        CatalogBackend::Local
    }
}
