use std::fmt::{Display, Formatter, Result as FmtResult};

use bytes::Bytes;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::preview::PreviewKind;

/// Opaque identifier of a catalog entry.
///
/// Ids read back from a stored catalog are accepted verbatim, so catalogs written by
/// other clients keep their identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    /// Fresh random id (UUID v4, hyphenless).
    pub fn generate() -> Self {
        FileId(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<String> for FileId {
    fn from(value: String) -> Self {
        FileId(value)
    }
}

impl From<&str> for FileId {
    fn from(value: &str) -> Self {
        FileId(value.to_string())
    }
}

impl AsRef<str> for FileId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Persisted projection of a catalog entry. Never carries file bytes.
///
/// Serialized with the field names other clients of the same store expect:
/// `id`, `name`, `size`, `type`, `uploadedAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub id: FileId,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type", default)]
    pub mime_type: String,
    pub uploaded_at: DateTime<Utc>,
}

impl FileMetadata {
    /// Metadata for a file admitted now. The timestamp is kept at millisecond precision.
    pub fn new(
        id: FileId,
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
    ) -> Self {
        FileMetadata {
            id,
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            uploaded_at: Utc::now().trunc_subsecs(3),
        }
    }
}

/// One uploaded artifact: its metadata plus the bytes, when this session has them.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub metadata: FileMetadata,
    payload: Option<Bytes>,
}

impl FileRecord {
    /// Record ingested in the current session.
    pub fn new(metadata: FileMetadata, payload: Bytes) -> Self {
        FileRecord {
            metadata,
            payload: Some(payload),
        }
    }

    /// Record hydrated from the catalog store; its bytes are not available.
    pub fn from_metadata(metadata: FileMetadata) -> Self {
        FileRecord {
            metadata,
            payload: None,
        }
    }

    pub fn id(&self) -> &FileId {
        &self.metadata.id
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn size(&self) -> u64 {
        self.metadata.size
    }

    pub fn mime_type(&self) -> &str {
        &self.metadata.mime_type
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.metadata.uploaded_at
    }

    pub fn payload(&self) -> Option<&Bytes> {
        self.payload.as_ref()
    }

    /// Whether the bytes can be previewed, opened or downloaded in this session.
    pub fn is_available(&self) -> bool {
        self.payload.is_some()
    }

    pub fn preview_kind(&self) -> PreviewKind {
        PreviewKind::from_mime_type(&self.metadata.mime_type)
    }
}

impl From<FileMetadata> for FileRecord {
    fn from(metadata: FileMetadata) -> Self {
        FileRecord::from_metadata(metadata)
    }
}
