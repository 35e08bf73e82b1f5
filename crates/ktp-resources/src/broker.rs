//! Short-lived handles to in-session file bytes.
//!
//! A handle is minted per preview, open or download and is revoked when the
//! consumer is done with it. Dropping a [`FileHandle`] revokes it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use ktp_core::constants::HANDLE_URL_PREFIX;
use ktp_core::{AppError, AppResult, FileId, FileRecord};
use tracing::debug;
use uuid::Uuid;

type Registry = Arc<Mutex<HashMap<String, Bytes>>>;

/// Mints and resolves handle URLs for records that carry a payload.
#[derive(Debug, Clone, Default)]
pub struct HandleBroker {
    live: Registry,
}

impl HandleBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a handle for the record's bytes.
    ///
    /// Fails with [`AppError::Unavailable`] when the record was reloaded from the
    /// catalog and carries no payload.
    pub fn mint(&self, record: &FileRecord) -> AppResult<FileHandle> {
        let payload = record
            .payload()
            .ok_or_else(|| AppError::unavailable(record.id().as_str(), record.name()))?
            .clone();

        let url = format!("{}{}", HANDLE_URL_PREFIX, Uuid::new_v4());
        lock(&self.live).insert(url.clone(), payload.clone());

        debug!(
            file_id = %record.id(),
            url = %url,
            size_bytes = payload.len(),
            "Handle minted"
        );

        Ok(FileHandle {
            url,
            file_id: record.id().clone(),
            data: payload,
            live: Arc::clone(&self.live),
            revoked: false,
        })
    }

    /// Dereference a handle URL. Returns `None` once the handle is revoked.
    pub fn resolve(&self, url: &str) -> Option<Bytes> {
        lock(&self.live).get(url).cloned()
    }

    /// Number of handles not yet revoked.
    pub fn live_handles(&self) -> usize {
        lock(&self.live).len()
    }
}

/// A live reference to a record's bytes, addressable by its URL.
#[derive(Debug)]
pub struct FileHandle {
    url: String,
    file_id: FileId,
    data: Bytes,
    live: Registry,
    revoked: bool,
}

impl FileHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn file_id(&self) -> &FileId {
        &self.file_id
    }

    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    pub fn is_live(&self) -> bool {
        !self.revoked && lock(&self.live).contains_key(&self.url)
    }

    /// Revoke the handle now instead of at drop.
    pub fn revoke(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.revoked {
            return;
        }
        self.revoked = true;
        lock(&self.live).remove(&self.url);
        debug!(file_id = %self.file_id, url = %self.url, "Handle revoked");
    }
}

impl Drop for FileHandle {
    fn drop(&mut self) {
        self.release();
    }
}

fn lock(registry: &Registry) -> MutexGuard<'_, HashMap<String, Bytes>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ktp_core::FileMetadata;

    fn record_with_payload() -> FileRecord {
        FileRecord::new(
            FileMetadata::new(FileId::from("abc"), "b.png", 3, "image/png"),
            Bytes::from_static(b"png"),
        )
    }

    #[test]
    fn test_mint_and_resolve() {
        let broker = HandleBroker::new();
        let handle = broker.mint(&record_with_payload()).unwrap();

        assert!(handle.url().starts_with("blob:ktp/"));
        assert_eq!(handle.file_id().as_str(), "abc");
        assert_eq!(broker.resolve(handle.url()).unwrap(), Bytes::from_static(b"png"));
        assert!(handle.is_live());
        assert_eq!(broker.live_handles(), 1);
    }

    #[test]
    fn test_drop_revokes() {
        let broker = HandleBroker::new();
        let url = {
            let handle = broker.mint(&record_with_payload()).unwrap();
            handle.url().to_string()
        };

        assert!(broker.resolve(&url).is_none());
        assert_eq!(broker.live_handles(), 0);
    }

    #[test]
    fn test_explicit_revoke() {
        let broker = HandleBroker::new();
        let handle = broker.mint(&record_with_payload()).unwrap();
        let url = handle.url().to_string();

        handle.revoke();
        assert!(broker.resolve(&url).is_none());
    }

    #[test]
    fn test_each_mint_gets_a_distinct_url() {
        let broker = HandleBroker::new();
        let record = record_with_payload();
        let a = broker.mint(&record).unwrap();
        let b = broker.mint(&record).unwrap();

        assert_ne!(a.url(), b.url());
        assert_eq!(broker.live_handles(), 2);

        drop(a);
        assert!(b.is_live());
        assert_eq!(broker.live_handles(), 1);
    }

    #[test]
    fn test_mint_without_payload_is_unavailable() {
        let broker = HandleBroker::new();
        let record = FileRecord::from_metadata(FileMetadata::new(
            FileId::from("zombie"),
            "a.txt",
            1024,
            "text/plain",
        ));

        match broker.mint(&record) {
            Err(AppError::Unavailable { id, name }) => {
                assert_eq!(id, "zombie");
                assert_eq!(name, "a.txt");
            }
            other => panic!("expected Unavailable, got {:?}", other),
        }
        assert_eq!(broker.live_handles(), 0);
    }
}
