//! Mock collaborators for testing

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use ktp_core::{AppError, AppResult, FileMetadata};
use ktp_storage::{CatalogError, CatalogStore, StorageError};

use crate::actions::{DownloadSink, ExternalOpener};
use crate::broker::FileHandle;
use crate::notify::{Notification, NotificationLevel, Notifier};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Notifier that keeps every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.notifications).clone()
    }

    pub fn messages(&self) -> Vec<String> {
        lock(&self.notifications)
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn last(&self) -> Option<Notification> {
        lock(&self.notifications).last().cloned()
    }

    pub fn count(&self, level: NotificationLevel) -> usize {
        lock(&self.notifications)
            .iter()
            .filter(|n| n.level == level)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        lock(&self.notifications).push(notification);
    }
}

/// Catalog store whose saves always fail. Loads return the seeded catalog.
#[derive(Debug, Default)]
pub struct FailingCatalogStore {
    seeded: Vec<FileMetadata>,
    save_attempts: Mutex<usize>,
}

impl FailingCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(seeded: Vec<FileMetadata>) -> Self {
        FailingCatalogStore {
            seeded,
            save_attempts: Mutex::new(0),
        }
    }

    pub fn save_attempts(&self) -> usize {
        *lock(&self.save_attempts)
    }
}

#[async_trait]
impl CatalogStore for FailingCatalogStore {
    async fn load(&self) -> Vec<FileMetadata> {
        self.seeded.clone()
    }

    async fn save(&self, _catalog: &[FileMetadata]) -> Result<(), CatalogError> {
        *lock(&self.save_attempts) += 1;
        Err(CatalogError::Write {
            key: "uploadedFiles".to_string(),
            source: StorageError::WriteFailed("quota exceeded".to_string()),
        })
    }
}

/// Download sink that keeps downloads in memory.
#[derive(Debug, Default)]
pub struct RecordingDownloadSink {
    saved: Mutex<Vec<(String, Bytes)>>,
}

impl RecordingDownloadSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Vec<(String, Bytes)> {
        lock(&self.saved).clone()
    }
}

#[async_trait]
impl DownloadSink for RecordingDownloadSink {
    async fn save(&self, file_name: &str, data: &Bytes) -> AppResult<PathBuf> {
        lock(&self.saved).push((file_name.to_string(), data.clone()));
        Ok(PathBuf::from(file_name))
    }
}

/// What an opener observed when it was handed a handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedHandle {
    pub url: String,
    pub file_name: String,
    pub was_live: bool,
    pub data: Bytes,
}

/// External opener that records the handles it is given. Can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<OpenedHandle>>,
    fail: bool,
}

impl RecordingOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        RecordingOpener {
            opened: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn opened(&self) -> Vec<OpenedHandle> {
        lock(&self.opened).clone()
    }
}

#[async_trait]
impl ExternalOpener for RecordingOpener {
    async fn open(&self, handle: &FileHandle, file_name: &str) -> AppResult<()> {
        lock(&self.opened).push(OpenedHandle {
            url: handle.url().to_string(),
            file_name: file_name.to_string(),
            was_live: handle.is_live(),
            data: handle.bytes().clone(),
        });
        if self.fail {
            return Err(AppError::Io("viewer refused to open".to_string()));
        }
        Ok(())
    }
}
