//! Test fixtures

use std::sync::Arc;

use ktp_core::{content_type_for_filename, ResourceContext};
use ktp_storage::{CatalogStore, KeyValueCatalogStore, MemoryKeyValueStore};

use super::mocks::RecordingNotifier;
use crate::manager::ResourceManager;
use crate::types::IncomingFile;

/// Catalog key used by fixtures.
pub const TEST_CATALOG_KEY: &str = "uploadedFiles";

/// An incoming file of `size` zero bytes with the type derived from its extension.
pub fn incoming_file(name: &str, size: usize) -> IncomingFile {
    IncomingFile::new(name, content_type_for_filename(name), vec![0u8; size])
}

/// An incoming file with explicit type and contents.
pub fn incoming_with(name: &str, mime_type: &str, data: &[u8]) -> IncomingFile {
    IncomingFile::new(name, mime_type, data.to_vec())
}

/// A catalog store over a shared in-memory key-value store.
pub fn memory_catalog(kv: &MemoryKeyValueStore) -> Arc<dyn CatalogStore> {
    Arc::new(KeyValueCatalogStore::new(
        Arc::new(kv.clone()),
        TEST_CATALOG_KEY,
    ))
}

/// A manager over `kv` with the default context and a recording notifier.
pub async fn open_manager(kv: &MemoryKeyValueStore) -> (ResourceManager, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let manager = ResourceManager::open(
        ResourceContext::default(),
        memory_catalog(kv),
        notifier.clone(),
    )
    .await;
    (manager, notifier)
}
