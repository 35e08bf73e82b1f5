//! Download and open-externally destinations.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;
use ktp_core::{AppError, AppResult};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::broker::FileHandle;

/// Hands a live handle to something outside the manager, such as a new tab or an
/// external viewer. The handle is revoked once `open` returns.
#[async_trait]
pub trait ExternalOpener: Send + Sync {
    async fn open(&self, handle: &FileHandle, file_name: &str) -> AppResult<()>;
}

/// Receives downloaded bytes under the suggested file name.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Store the bytes and return where they ended up.
    async fn save(&self, file_name: &str, data: &Bytes) -> AppResult<PathBuf>;
}

/// Writes downloads into a directory, one file per download. An existing file is
/// never replaced; the new one is saved as `name (1).ext`, `name (2).ext`, ...
#[derive(Debug, Clone)]
pub struct DirectoryDownloadSink {
    dir: PathBuf,
}

impl DirectoryDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectoryDownloadSink { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn create_unique(&self, name: &str) -> AppResult<(PathBuf, File)> {
        let mut attempt = 0;
        loop {
            let target = self.dir.join(numbered_name(name, attempt));
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&target)
                .await
            {
                Ok(file) => return Ok((target, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(path = %target.display(), "Download name taken");
                    attempt += 1;
                }
                Err(e) => {
                    return Err(AppError::Io(format!(
                        "Failed to create {}: {}",
                        target.display(),
                        e
                    )))
                }
            }
        }
    }
}

/// `report.pdf` becomes `report (n).pdf`; a name without an extension gets the
/// suffix at the end. Attempt 0 is the name itself.
fn numbered_name(name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return name.to_string();
    }
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{} ({}){}", &name[..dot], attempt, &name[dot..]),
        _ => format!("{} ({})", name, attempt),
    }
}

#[async_trait]
impl DownloadSink for DirectoryDownloadSink {
    async fn save(&self, file_name: &str, data: &Bytes) -> AppResult<PathBuf> {
        let start = Instant::now();

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Io(format!(
                "Failed to create download directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let (target, mut file) = self.create_unique(&sanitize_filename(file_name)).await?;
        let write_err = |e: std::io::Error| {
            AppError::Io(format!("Failed to write {}: {}", target.display(), e))
        };
        file.write_all(data).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)?;

        info!(
            path = %target.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "File downloaded"
        );

        Ok(target)
    }
}

/// Reduce a display name to a safe basename for the local filesystem.
///
/// Directory components are stripped, names containing `..` are replaced, and
/// characters outside letters, digits, spaces and `.-_()` become `_`.
pub fn sanitize_filename(filename: &str) -> String {
    const MAX: usize = 255;
    const FALLBACK: &str = "download";

    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    if base.contains("..") {
        return FALLBACK.to_string();
    }

    let sanitized: String = base
        .chars()
        .take(MAX)
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ' | '(' | ')') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = sanitized.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        FALLBACK.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sanitize_keeps_ordinary_names() {
        assert_eq!(sanitize_filename("b.png"), "b.png");
        assert_eq!(
            sanitize_filename("UI Component Guidelines.pdf"),
            "UI Component Guidelines.pdf"
        );
        assert_eq!(sanitize_filename("report (1).txt"), "report (1).txt");
    }

    #[test]
    fn test_sanitize_strips_directories_and_traversal() {
        assert_eq!(sanitize_filename("/etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\tmp\\evil.exe"), "evil.exe");
        assert_eq!(sanitize_filename("a..b"), "download");
        assert_eq!(sanitize_filename(".."), "download");
        assert_eq!(sanitize_filename("dir/"), "download");
        assert_eq!(sanitize_filename(""), "download");
    }

    #[test]
    fn test_sanitize_replaces_odd_characters() {
        assert_eq!(sanitize_filename("a:b*c?.txt"), "a_b_c_.txt");
    }

    #[tokio::test]
    async fn test_directory_sink_writes_file() {
        let dir = tempdir().unwrap();
        let sink = DirectoryDownloadSink::new(dir.path().join("downloads"));

        let path = sink
            .save("b.png", &Bytes::from_static(b"png-bytes"))
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("downloads").join("b.png"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"png-bytes");
    }

    #[test]
    fn test_numbered_name() {
        assert_eq!(numbered_name("a.txt", 0), "a.txt");
        assert_eq!(numbered_name("a.txt", 1), "a (1).txt");
        assert_eq!(numbered_name("archive.tar.gz", 2), "archive.tar (2).gz");
        assert_eq!(numbered_name("README", 1), "README (1)");
        assert_eq!(numbered_name(".env", 1), ".env (1)");
    }

    #[tokio::test]
    async fn test_directory_sink_never_overwrites() {
        let dir = tempdir().unwrap();
        let sink = DirectoryDownloadSink::new(dir.path());

        let first = sink.save("a.txt", &Bytes::from_static(b"one")).await.unwrap();
        let second = sink.save("a.txt", &Bytes::from_static(b"two")).await.unwrap();
        let third = sink.save("a.txt", &Bytes::from_static(b"three")).await.unwrap();
        let bare = sink.save("a", &Bytes::from_static(b"four")).await.unwrap();
        let bare_again = sink.save("a", &Bytes::from_static(b"five")).await.unwrap();

        assert_eq!(first, dir.path().join("a.txt"));
        assert_eq!(second, dir.path().join("a (1).txt"));
        assert_eq!(third, dir.path().join("a (2).txt"));
        assert_eq!(bare, dir.path().join("a"));
        assert_eq!(bare_again, dir.path().join("a (1)"));
        assert_eq!(tokio::fs::read(&first).await.unwrap(), b"one");
        assert_eq!(tokio::fs::read(&second).await.unwrap(), b"two");
        assert_eq!(tokio::fs::read(&third).await.unwrap(), b"three");
    }

    #[tokio::test]
    async fn test_directory_sink_cannot_escape_its_directory() {
        let dir = tempdir().unwrap();
        let sink = DirectoryDownloadSink::new(dir.path());

        let path = sink
            .save("../../outside.txt", &Bytes::from_static(b"x"))
            .await
            .unwrap();

        assert_eq!(path.parent().unwrap(), dir.path());
    }
}
