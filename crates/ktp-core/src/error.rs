//! Error types module
//!
//! This module provides the application-level error type used by the resource manager
//! and its front ends. Store failures, unavailable payloads and lookup misses are all
//! unified under `AppError`, which can describe how it should be shown to a user.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like unknown ids
    Debug,
    /// Warning level - for recoverable issues like an unreadable catalog
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to the user.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "FILE_UNAVAILABLE")
    fn error_code(&self) -> &'static str;

    /// Suggested next step for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// User-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The record exists but its bytes were not ingested in this session.
    #[error("File {id} ({name}) is not available in this session")]
    Unavailable { id: String, name: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Catalog read failed: {0}")]
    StoreRead(String),

    #[error("Catalog write failed: {0}")]
    StoreWrite(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Static metadata for each variant: (error_code, suggested_action, log_level).
fn app_error_static_metadata(err: &AppError) -> (&'static str, Option<&'static str>, LogLevel) {
    match err {
        AppError::Unavailable { .. } => (
            "FILE_UNAVAILABLE",
            Some("Upload the file again to preview or download it"),
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            "NOT_FOUND",
            Some("Check the file id with the list command"),
            LogLevel::Debug,
        ),
        AppError::StoreRead(_) => ("STORE_READ_ERROR", Some("Reload the catalog"), LogLevel::Warn),
        AppError::StoreWrite(_) => (
            "STORE_WRITE_ERROR",
            Some("Check that the data directory is writable"),
            LogLevel::Error,
        ),
        AppError::InvalidInput(_) => (
            "INVALID_INPUT",
            Some("Check command arguments and try again"),
            LogLevel::Debug,
        ),
        AppError::Io(_) => ("IO_ERROR", Some("Check the path and permissions"), LogLevel::Warn),
    }
}

impl AppError {
    /// Build the unavailable-payload error for a record.
    pub fn unavailable(id: impl Into<String>, name: impl Into<String>) -> Self {
        AppError::Unavailable {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).0
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Unavailable { name, .. } => format!(
                "Cannot preview or download \"{}\": file not available in this session",
                name
            ),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::StoreRead(_) => "Failed to read the resource catalog".to_string(),
            AppError::StoreWrite(_) => "Failed to save the resource catalog".to_string(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::Io(ref msg) => msg.clone(),
        }
    }
}
