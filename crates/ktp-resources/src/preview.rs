//! Preview dispatch by content type.

use ktp_core::{AppError, AppResult, FileRecord, PreviewKind};

use crate::broker::{FileHandle, HandleBroker};

pub const TEXT_PREVIEW_UNAVAILABLE: &str =
    "Text file preview not available. Click download to view the file.";
pub const GENERIC_PREVIEW_UNAVAILABLE: &str = "Preview not available for this file type";

/// What the viewer shows for a record. Inline previews hold a live handle that is
/// revoked when the preview is dropped.
#[derive(Debug)]
pub enum Preview {
    Image { handle: FileHandle },
    Document { handle: FileHandle },
    Text { message: &'static str },
    Generic { message: &'static str },
}

impl Preview {
    /// Build the preview for a record.
    ///
    /// A record without a payload cannot be previewed at all, whatever its type.
    pub fn render(broker: &HandleBroker, record: &FileRecord) -> AppResult<Preview> {
        if !record.is_available() {
            return Err(AppError::unavailable(record.id().as_str(), record.name()));
        }

        let preview = match record.preview_kind() {
            PreviewKind::Image => Preview::Image {
                handle: broker.mint(record)?,
            },
            PreviewKind::Document => Preview::Document {
                handle: broker.mint(record)?,
            },
            PreviewKind::Text => Preview::Text {
                message: TEXT_PREVIEW_UNAVAILABLE,
            },
            PreviewKind::Generic => Preview::Generic {
                message: GENERIC_PREVIEW_UNAVAILABLE,
            },
        };
        Ok(preview)
    }

    pub fn kind(&self) -> PreviewKind {
        match self {
            Preview::Image { .. } => PreviewKind::Image,
            Preview::Document { .. } => PreviewKind::Document,
            Preview::Text { .. } => PreviewKind::Text,
            Preview::Generic { .. } => PreviewKind::Generic,
        }
    }

    pub fn handle(&self) -> Option<&FileHandle> {
        match self {
            Preview::Image { handle } | Preview::Document { handle } => Some(handle),
            Preview::Text { .. } | Preview::Generic { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            Preview::Text { message } | Preview::Generic { message } => Some(*message),
            Preview::Image { .. } | Preview::Document { .. } => None,
        }
    }
}
