//! Ingestion input and output types

use std::path::Path;

use bytes::Bytes;
use ktp_core::{content_type_for_filename, AppError, AppResult, FileId};

/// A file handed to the ingestion pipeline by a drop or the file chooser.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub name: String,
    /// Declared content type; may be empty.
    pub mime_type: String,
    pub data: Bytes,
}

impl IncomingFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        IncomingFile {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk. The declared type is derived from the extension.
    pub async fn from_path(path: &Path) -> AppResult<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                AppError::InvalidInput(format!("Not a file path: {}", path.display()))
            })?;

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

        let mime_type = content_type_for_filename(&name);
        Ok(IncomingFile::new(name, mime_type, data))
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Result of one ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Ids of the records appended by this ingestion, in input order.
    pub admitted: Vec<FileId>,
    /// Catalog length after the ingestion.
    pub total: usize,
    /// Whether the updated catalog metadata reached the store.
    pub persisted: bool,
}

impl IngestOutcome {
    pub(crate) fn noop(total: usize) -> Self {
        IngestOutcome {
            admitted: Vec::new(),
            total,
            persisted: true,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.admitted.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_from_path_reads_bytes_and_type() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("b.png");
        tokio::fs::write(&path, vec![7u8; 2048]).await.unwrap();

        let file = IncomingFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "b.png");
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(file.size(), 2048);
    }

    #[tokio::test]
    async fn test_from_path_unknown_extension_has_empty_type() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("LICENSE");
        tokio::fs::write(&path, b"MIT").await.unwrap();

        let file = IncomingFile::from_path(&path).await.unwrap();
        assert_eq!(file.mime_type, "");
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let dir = tempdir().unwrap();
        let result = IncomingFile::from_path(&dir.path().join("missing.txt")).await;
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
