// src/pipeline/tick.rs

//! One fetch-compare-act cycle.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::ContentDigest;
use crate::pipeline::detect::{Detection, detect_change};
use crate::pipeline::digest::fingerprint;
use crate::services::{Notifier, ReportSource};
use crate::storage::ReportStore;
use crate::utils::log::step;

const TOTAL_STEPS: usize = 4;

/// Result of a tick that ran to completion.
#[derive(Debug, Clone, Serialize)]
pub struct TickOutcome {
    pub detection: Detection,
    pub digest: ContentDigest,
    pub previous_digest: Option<ContentDigest>,
    pub persisted: bool,
    pub notified: bool,
    pub finished_at: DateTime<Utc>,
}

/// Run one tick: fetch → fingerprint → detect → persist / notify.
///
/// A fetch or decode failure returns before anything is written or sent.
/// A delivery failure returns after the new report was persisted.
pub async fn run_tick(
    source: &dyn ReportSource,
    store: &dyn ReportStore,
    notifier: &dyn Notifier,
) -> Result<TickOutcome> {
    step(1, TOTAL_STEPS, "Fetch - Downloading report card");
    let artifact = source.fetch().await?;

    step(2, TOTAL_STEPS, "Fingerprint - Hashing normalized text");
    let digest = fingerprint(&artifact)?;
    let previous_digest = persisted_digest(store).await?;

    step(3, TOTAL_STEPS, "Detect - Comparing with last report");
    let detection = detect_change(&digest, previous_digest.as_ref());
    match (detection, &previous_digest) {
        (Detection::FirstSeen, _) => {
            log::info!("First time seeing the report, saving {}", store.location())
        }
        (Detection::Unchanged, _) => log::info!("No new changes detected"),
        (Detection::Changed, Some(previous)) => log::info!(
            "Detected new changes ({} -> {})",
            previous.short(),
            digest.short()
        ),
        (Detection::Changed, None) => log::info!("Detected new changes"),
    }

    step(4, TOTAL_STEPS, "Act - Persisting and notifying");
    let persisted = if detection.should_persist() {
        store.save(&artifact).await?;
        true
    } else {
        false
    };

    let notified = if detection.should_notify() {
        log::info!("Sending email with attachment");
        notifier.notify(&artifact).await?;
        true
    } else {
        false
    };

    Ok(TickOutcome {
        detection,
        digest,
        previous_digest,
        persisted,
        notified,
        finished_at: Utc::now(),
    })
}

/// Digest of the persisted report, if there is a readable one.
///
/// An unreadable file is treated as absent so the next save replaces it.
async fn persisted_digest(store: &dyn ReportStore) -> Result<Option<ContentDigest>> {
    let Some(previous) = store.load().await? else {
        return Ok(None);
    };

    match fingerprint(&previous) {
        Ok(digest) => Ok(Some(digest)),
        Err(e) => {
            log::warn!(
                "Persisted report at {} is unreadable ({e}); treating it as absent",
                store.location()
            );
            Ok(None)
        }
    }
}

/// Log a failed tick with its failure class.
pub fn report_failure(error: &AppError) {
    match error.category() {
        "delivery" => log::error!(
            "Tick failed ({}): {}. The change is recorded locally; this notification is lost",
            error.category(),
            error
        ),
        category => log::error!("Tick aborted ({category}): {error}"),
    }
}
