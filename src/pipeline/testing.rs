//! In-memory collaborators for tick and scheduler tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::ReportArtifact;
use crate::services::{Notifier, ReportSource};
use crate::storage::{ReportStore, WriteMetadata};

/// What the fake portal answers on one fetch.
pub enum Response {
    Pdf(Vec<u8>),
    Status(u16),
}

/// Portal that replays a scripted list of responses.
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Response>>,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Response>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl ReportSource for ScriptedSource {
    async fn fetch(&self) -> Result<ReportArtifact> {
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Response::Pdf(bytes)) => Ok(ReportArtifact::new(bytes)),
            Some(Response::Status(status)) => Err(AppError::fetch("fake://report", status)),
            None => Err(AppError::fetch("fake://report", 404)),
        }
    }
}

/// Store keeping the report in memory and counting writes.
#[derive(Default)]
pub struct MemoryStore {
    pub content: Mutex<Option<Vec<u8>>>,
    pub writes: Mutex<usize>,
}

impl MemoryStore {
    pub fn with_content(bytes: Vec<u8>) -> Self {
        Self {
            content: Mutex::new(Some(bytes)),
            writes: Mutex::new(0),
        }
    }

    pub fn content(&self) -> Option<Vec<u8>> {
        self.content.lock().unwrap().clone()
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn load(&self) -> Result<Option<ReportArtifact>> {
        Ok(self.content().map(ReportArtifact::new))
    }

    async fn save(&self, artifact: &ReportArtifact) -> Result<WriteMetadata> {
        *self.content.lock().unwrap() = Some(artifact.as_bytes().to_vec());
        *self.writes.lock().unwrap() += 1;
        Ok(WriteMetadata {
            location: self.location(),
            bytes_written: artifact.len(),
            timestamp: Utc::now(),
        })
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// Notifier recording every attachment it was asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Vec<u8>>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, artifact: &ReportArtifact) -> Result<()> {
        if self.fail {
            return Err(AppError::compose("relay refused authentication"));
        }
        self.sent.lock().unwrap().push(artifact.as_bytes().to_vec());
        Ok(())
    }
}
