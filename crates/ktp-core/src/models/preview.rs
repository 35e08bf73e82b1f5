use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// How a file is presented in the viewer, chosen from its declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    /// `image/*`, rendered inline.
    Image,
    /// `application/pdf`, rendered in an embedded viewer.
    Document,
    /// `text/*`, no inline preview; download instead.
    Text,
    /// Anything else, including an empty type.
    Generic,
}

impl PreviewKind {
    pub fn from_mime_type(mime_type: &str) -> Self {
        let normalized = mime_type.trim().to_lowercase();
        let essence = normalized.split(';').next().unwrap_or_default().trim();

        if essence.starts_with("image/") {
            PreviewKind::Image
        } else if essence == "application/pdf" {
            PreviewKind::Document
        } else if essence.starts_with("text/") {
            PreviewKind::Text
        } else {
            PreviewKind::Generic
        }
    }
}

impl Display for PreviewKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PreviewKind::Image => write!(f, "image"),
            PreviewKind::Document => write!(f, "document"),
            PreviewKind::Text => write!(f, "text"),
            PreviewKind::Generic => write!(f, "generic"),
        }
    }
}
