//! KTP Resources Library
//!
//! The role-scoped file resource manager: admits dropped or chosen files into a
//! catalog, persists the catalog metadata, and hands out short-lived handles to the
//! in-session bytes for preview, open-externally and download.
//!
//! Flow: drop zone / file chooser → [`ingest`] → [`CatalogStore`](ktp_storage::CatalogStore)
//! → listing → [`HandleBroker`] → [`Preview`] / [`DownloadSink`] / [`ExternalOpener`].

pub mod actions;
pub mod broker;
pub mod drop_zone;
pub mod ingest;
pub mod manager;
pub mod notify;
pub mod preview;
pub mod test_helpers;
pub mod types;

// Re-export commonly used types
pub use actions::{sanitize_filename, DirectoryDownloadSink, DownloadSink, ExternalOpener};
pub use broker::{FileHandle, HandleBroker};
pub use drop_zone::{DropState, DropZone};
pub use ingest::{admit_batch, admit_batch_with};
pub use manager::ResourceManager;
pub use notify::{Notification, NotificationLevel, Notifier};
pub use preview::Preview;
pub use types::{IncomingFile, IngestOutcome};
