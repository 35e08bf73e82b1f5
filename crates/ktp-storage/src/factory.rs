#[cfg(feature = "storage-local")]
use crate::LocalKeyValueStore;
use crate::{CatalogBackend, KeyValueCatalogStore, KeyValueStore, MemoryKeyValueStore};
#[cfg(not(feature = "storage-local"))]
use crate::StorageError;
use crate::StorageResult;
use ktp_core::{Config, ResourceContext};
use std::sync::Arc;

/// Create a key-value store backend based on configuration
pub async fn create_key_value_store(config: &Config) -> StorageResult<Arc<dyn KeyValueStore>> {
    match config.catalog_backend {
        #[cfg(feature = "storage-local")]
        CatalogBackend::Local => {
            let store = LocalKeyValueStore::new(config.data_dir()).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-local"))]
        CatalogBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        CatalogBackend::Memory => Ok(Arc::new(MemoryKeyValueStore::new())),
    }
}

/// Create the catalog store for a resource context.
pub async fn create_catalog_store(
    config: &Config,
    context: &ResourceContext,
) -> StorageResult<KeyValueCatalogStore> {
    let store = create_key_value_store(config).await?;
    let key = config.catalog_key_for(context);

    tracing::debug!(
        backend = %store.backend_type(),
        key = %key,
        "Catalog store created"
    );

    Ok(KeyValueCatalogStore::new(store, key))
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use crate::CatalogStore;
    use ktp_core::{FileId, FileMetadata};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_creates_configured_backend() {
        let dir = tempdir().unwrap();
        let local = Config {
            data_dir: dir.path().join("data"),
            ..Config::default()
        };
        let store = create_key_value_store(&local).await.unwrap();
        assert_eq!(store.backend_type(), CatalogBackend::Local);
        assert!(dir.path().join("data").is_dir());

        let memory = Config {
            catalog_backend: CatalogBackend::Memory,
            ..Config::default()
        };
        let store = create_key_value_store(&memory).await.unwrap();
        assert_eq!(store.backend_type(), CatalogBackend::Memory);
    }

    #[tokio::test]
    async fn test_catalog_store_uses_context_key() {
        let dir = tempdir().unwrap();
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            scope_catalog_by_context: true,
            ..Config::default()
        };
        let ctx = ResourceContext::new(Some("Atlas".into()), Some("Web".into()), None);

        let store = create_catalog_store(&config, &ctx).await.unwrap();
        assert_eq!(store.key(), "uploadedFiles:Atlas:Web:Frontend Developer");
    }

    #[tokio::test]
    async fn test_scoped_catalog_saves_for_any_context_strings() {
        let dir = tempdir().unwrap();
        let ctx = ResourceContext::new(
            Some("Release 1..2".into()),
            Some("Web/Mobile".into()),
            Some("/QA".into()),
        );
        let catalog = vec![FileMetadata::new(FileId::from("abc"), "a.txt", 10, "text/plain")];

        for backend in [CatalogBackend::Local, CatalogBackend::Memory] {
            let config = Config {
                catalog_backend: backend,
                data_dir: dir.path().to_path_buf(),
                scope_catalog_by_context: true,
                ..Config::default()
            };

            let store = create_catalog_store(&config, &ctx).await.unwrap();
            assert_eq!(store.key(), "uploadedFiles:Release 1..2:Web/Mobile:/QA");
            store.save(&catalog).await.unwrap();
            assert_eq!(store.try_load().await.unwrap(), catalog);
        }

        let reopened = create_catalog_store(
            &Config {
                data_dir: dir.path().to_path_buf(),
                scope_catalog_by_context: true,
                ..Config::default()
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(reopened.load().await, catalog);
    }
}
