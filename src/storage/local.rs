//! Local filesystem storage implementation.
//!
//! Keeps the last report card in a single file. Writes go to a sibling
//! temp file first and are renamed over the target, so a crash mid-write
//! leaves the previous report intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{ReportArtifact, StorageConfig};
use crate::storage::{ReportStore, WriteMetadata};
use crate::utils::pdf;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
    reserialize: bool,
}

impl LocalStorage {
    /// Create a LocalStorage writing raw bytes to the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            reserialize: false,
        }
    }

    /// Create a LocalStorage from the storage section of the config.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.report_path).with_reserialize(config.reserialize)
    }

    /// Round-trip PDFs through the parser before writing.
    pub fn with_reserialize(mut self, reserialize: bool) -> Self {
        self.reserialize = reserialize;
        self
    }

    /// Path of the persisted report.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    ///
    /// The temp file is removed if any step fails.
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let result = Self::write_then_rename(&tmp, &self.path, bytes).await;
        if result.is_err() {
            if let Err(e) = tokio::fs::remove_file(&tmp).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Cannot remove {}: {}", tmp.display(), e);
                }
            }
        }
        result
    }

    async fn write_then_rename(tmp: &Path, target: &Path, bytes: &[u8]) -> Result<()> {
        let mut file = tokio::fs::File::create(tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(tmp, target).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl ReportStore for LocalStorage {
    async fn load(&self) -> Result<Option<ReportArtifact>> {
        let bytes = self.read_bytes().await?;
        if bytes.is_none() {
            log::debug!("No persisted report at {}", self.path.display());
        }
        Ok(bytes.map(ReportArtifact::new))
    }

    async fn save(&self, artifact: &ReportArtifact) -> Result<WriteMetadata> {
        let bytes = if self.reserialize {
            pdf::reserialize(artifact.as_bytes())?
        } else {
            artifact.as_bytes().to_vec()
        };

        self.write_bytes(&bytes).await?;
        log::info!(
            "Report written to {} ({} bytes)",
            self.path.display(),
            bytes.len()
        );

        Ok(WriteMetadata {
            location: self.location(),
            bytes_written: bytes.len(),
            timestamp: Utc::now(),
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
