//! The resource manager for one page visit.
//!
//! Owns the in-memory catalog for a [`ResourceContext`], persists its metadata after
//! every ingestion, and routes view, open and download through the handle broker.
//! Failures that the user must see are reported through the [`Notifier`] and also
//! returned to the caller.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use ktp_core::{
    AppError, AppResult, ErrorMetadata, FileId, FileMetadata, FileRecord, LogLevel,
    ResourceContext,
};
use ktp_storage::CatalogStore;
use tracing::{debug, error, info, warn};

use crate::actions::{DownloadSink, ExternalOpener};
use crate::broker::HandleBroker;
use crate::drop_zone::{DropState, DropZone};
use crate::ingest::admit_batch;
use crate::notify::{Notification, Notifier};
use crate::preview::Preview;
use crate::types::{IncomingFile, IngestOutcome};

const PERSIST_FAILED_MESSAGE: &str =
    "Files were added but could not be saved; they will be missing after a reload";

pub struct ResourceManager {
    context: ResourceContext,
    store: Arc<dyn CatalogStore>,
    notifier: Arc<dyn Notifier>,
    broker: HandleBroker,
    drop_zone: DropZone,
    records: Vec<FileRecord>,
}

impl ResourceManager {
    /// Hydrate the catalog from the store. Hydrated records carry no payload.
    pub async fn open(
        context: ResourceContext,
        store: Arc<dyn CatalogStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let records: Vec<FileRecord> = store
            .load()
            .await
            .into_iter()
            .map(FileRecord::from_metadata)
            .collect();

        info!(
            role = %context.role,
            project = context.project.as_deref().unwrap_or("-"),
            sub_project = context.sub_project.as_deref().unwrap_or("-"),
            file_count = records.len(),
            "Resource manager opened"
        );

        ResourceManager {
            context,
            store,
            notifier,
            broker: HandleBroker::new(),
            drop_zone: DropZone::new(),
            records,
        }
    }

    pub fn context(&self) -> &ResourceContext {
        &self.context
    }

    /// Page title, e.g. "Frontend Developer Resources".
    pub fn title(&self) -> String {
        self.context.title()
    }

    pub fn breadcrumb(&self) -> String {
        self.context.breadcrumb()
    }

    pub fn broker(&self) -> &HandleBroker {
        &self.broker
    }

    /// Records in insertion order.
    pub fn list(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn list_metadata(&self) -> Vec<FileMetadata> {
        self.records.iter().map(|r| r.metadata.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &FileId) -> AppResult<&FileRecord> {
        self.records
            .iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("No file with id {}", id)))
    }

    /// Append a batch to the catalog and persist the catalog metadata.
    ///
    /// An empty batch is a no-op. A failed save keeps the new records in memory and
    /// reports `persisted: false`.
    pub async fn ingest(&mut self, batch: Vec<IncomingFile>) -> IngestOutcome {
        if batch.is_empty() {
            debug!("Empty batch, nothing to ingest");
            return IngestOutcome::noop(self.records.len());
        }

        let start = Instant::now();
        let admitted = admit_batch(&self.records, batch);
        let ids: Vec<FileId> = admitted.iter().map(|r| r.id().clone()).collect();
        let size_bytes: u64 = admitted.iter().map(FileRecord::size).sum();
        self.records.extend(admitted);

        let persisted = match self.store.save(&self.list_metadata()).await {
            Ok(()) => true,
            Err(e) => {
                let err = AppError::from(e);
                error!(
                    error = %err,
                    code = err.error_code(),
                    file_count = self.records.len(),
                    "Failed to persist catalog"
                );
                self.notifier.notify(
                    Notification::warning(PERSIST_FAILED_MESSAGE).with_hint(err.suggested_action()),
                );
                false
            }
        };

        info!(
            admitted = ids.len(),
            total = self.records.len(),
            size_bytes = size_bytes,
            persisted = persisted,
            duration_ms = start.elapsed().as_millis() as u64,
            "Files ingested"
        );

        self.notifier.notify(Notification::info(format!(
            "Successfully uploaded {} file(s)!",
            ids.len()
        )));

        IngestOutcome {
            admitted: ids,
            total: self.records.len(),
            persisted,
        }
    }

    pub fn drag_enter(&mut self) {
        self.drop_zone.drag_enter();
    }

    pub fn drag_leave(&mut self) {
        self.drop_zone.drag_leave();
    }

    pub fn drop_state(&self) -> DropState {
        self.drop_zone.state()
    }

    pub fn is_dragging(&self) -> bool {
        self.drop_zone.is_dragging()
    }

    /// Files dropped on the target. Ingests regardless of the drag state.
    pub async fn drop_files(&mut self, batch: Vec<IncomingFile>) -> IngestOutcome {
        let arrived_in = self.drop_zone.drop_received();
        debug!(state = ?arrived_in, file_count = batch.len(), "Drop received");
        self.ingest(batch).await
    }

    /// Files picked through the chooser. A cancelled chooser passes an empty batch.
    pub async fn choose_files(&mut self, batch: Vec<IncomingFile>) -> IngestOutcome {
        self.ingest(batch).await
    }

    /// Open the viewer for a record.
    pub fn view(&self, id: &FileId) -> AppResult<Preview> {
        let record = self.get(id).map_err(|e| self.report(e))?;
        Preview::render(&self.broker, record).map_err(|e| self.report(e))
    }

    /// Hand the record's bytes to an external opener.
    pub async fn open_external(&self, id: &FileId, opener: &dyn ExternalOpener) -> AppResult<()> {
        let record = self.get(id).map_err(|e| self.report(e))?;
        let handle = self.broker.mint(record).map_err(|e| self.report(e))?;

        let result = opener.open(&handle, record.name()).await;
        handle.revoke();
        result.map_err(|e| self.report(e))
    }

    /// Save the record's bytes under its name.
    pub async fn download(&self, id: &FileId, sink: &dyn DownloadSink) -> AppResult<PathBuf> {
        let record = self.get(id).map_err(|e| self.report(e))?;
        let handle = self.broker.mint(record).map_err(|e| self.report(e))?;

        let result = sink.save(record.name(), handle.bytes()).await;
        handle.revoke();
        result.map_err(|e| self.report(e))
    }

    fn report(&self, err: AppError) -> AppError {
        match err.log_level() {
            LogLevel::Debug => debug!(error = %err, code = err.error_code(), "Action failed"),
            LogLevel::Warn => warn!(error = %err, code = err.error_code(), "Action failed"),
            LogLevel::Error => error!(error = %err, code = err.error_code(), "Action failed"),
        }
        self.notifier
            .notify(Notification::error(err.client_message()).with_hint(err.suggested_action()));
        err
    }
}

impl std::fmt::Debug for ResourceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceManager")
            .field("context", &self.context)
            .field("drop_zone", &self.drop_zone)
            .field("records", &self.records.len())
            .finish()
    }
}
