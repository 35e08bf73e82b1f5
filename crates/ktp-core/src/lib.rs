//! KTP Core Library
//!
//! This crate provides the domain models, formatting helpers, error types and
//! configuration shared by the role-scoped file resource manager and its front ends.

pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use error::{AppError, AppResult, ErrorMetadata, LogLevel};
pub use format::{format_size, format_uploaded_at};
pub use models::{
    content_type_for_filename, FileId, FileMetadata, FileRecord, PreviewKind, ResourceContext,
};
pub use storage_types::CatalogBackend;
