//! Console-side collaborators: notifications on stderr and an opener that spools
//! bytes to a local file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ktp_core::{AppError, AppResult};
use ktp_resources::{
    sanitize_filename, ExternalOpener, FileHandle, Notification, NotificationLevel, Notifier,
};

/// Prints notifications to stderr, one line each.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        eprintln!("{}", render_notification(&notification));
    }
}

pub fn render_notification(notification: &Notification) -> String {
    let tag = match notification.level {
        NotificationLevel::Info => "info",
        NotificationLevel::Warning => "warning",
        NotificationLevel::Error => "error",
    };
    match &notification.hint {
        Some(hint) => format!("[{}] {} ({})", tag, notification.message, hint),
        None => format!("[{}] {}", tag, notification.message),
    }
}

/// Writes the handle's bytes into a spool directory and reports the path, for a
/// desktop viewer to pick up.
#[derive(Debug, Clone)]
pub struct SpoolOpener {
    dir: PathBuf,
}

impl SpoolOpener {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SpoolOpener { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ExternalOpener for SpoolOpener {
    async fn open(&self, handle: &FileHandle, file_name: &str) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Io(format!(
                "Failed to create spool directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let target = self.dir.join(sanitize_filename(file_name));
        tokio::fs::write(&target, handle.bytes())
            .await
            .map_err(|e| AppError::Io(format!("Failed to write {}: {}", target.display(), e)))?;

        tracing::info!(url = %handle.url(), path = %target.display(), "Opened externally");
        println!("Opened {} ({}) at {}", file_name, handle.url(), target.display());
        Ok(())
    }
}
