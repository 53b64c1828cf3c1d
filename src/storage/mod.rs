//! Storage abstraction for the last seen report.
//!
//! Exactly one report is kept. Its presence is the "seen before" signal;
//! a detected change overwrites it and nothing ever deletes it.
//!
//! ```text
//! reports/
//! └── report.pdf     # last fetched report card
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::ReportArtifact;

// Re-export for convenience
pub use local::LocalStorage;

/// Metadata about a storage write operation.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    /// Where the report was written
    pub location: String,
    /// Number of bytes written
    pub bytes_written: usize,
    /// Timestamp of the write
    pub timestamp: DateTime<Utc>,
}

/// Trait for report storage backends.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Load the persisted report, `None` if nothing was saved yet.
    async fn load(&self) -> Result<Option<ReportArtifact>>;

    /// Replace the persisted report.
    async fn save(&self, artifact: &ReportArtifact) -> Result<WriteMetadata>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}
