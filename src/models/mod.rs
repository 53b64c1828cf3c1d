// src/models/mod.rs

//! Domain models for the report watcher.
//!
//! This module contains the configuration tree and the two values that
//! flow through a tick: the fetched report and its content digest.

mod config;
mod report;

// Re-export all public types
pub use config::{
    Config, Credentials, MailConfig, PortalConfig, ScheduleConfig, StorageConfig, env,
};
pub use report::{ContentDigest, ReportArtifact};
