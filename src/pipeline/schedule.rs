// src/pipeline/schedule.rs

//! Fixed-interval scheduling of ticks.
//!
//! Ticks are awaited inline, so a slow tick delays the next one instead of
//! overlapping it. Tick errors are logged and never end the loop.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::models::ScheduleConfig;
use crate::pipeline::tick::{TickOutcome, report_failure, run_tick};
use crate::services::{Notifier, ReportSource};
use crate::storage::ReportStore;
use crate::utils::log;

/// Counters over the lifetime of a scheduler loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleSummary {
    pub ticks: u64,
    pub failures: u64,
    pub persisted: u64,
    pub notifications: u64,
}

impl ScheduleSummary {
    fn record(&mut self, outcome: &TickOutcome) {
        if outcome.persisted {
            self.persisted += 1;
        }
        if outcome.notified {
            self.notifications += 1;
        }
    }
}

/// Run ticks every `interval_secs` until `shutdown` resolves.
///
/// The first tick fires after one interval unless `run_on_start` is set.
/// With `max_ticks`, the loop also ends after that many ticks.
pub async fn run_scheduler<F>(
    config: &ScheduleConfig,
    source: &dyn ReportSource,
    store: &dyn ReportStore,
    notifier: &dyn Notifier,
    shutdown: F,
) -> ScheduleSummary
where
    F: Future<Output = ()>,
{
    let period = Duration::from_secs(config.interval_secs.max(1));
    let start = if config.run_on_start {
        Instant::now()
    } else {
        Instant::now() + period
    };

    let mut ticker = interval_at(start, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    log::header("Report watcher started");
    ::log::info!(
        "Checking {} every {}s",
        store.location(),
        period.as_secs()
    );

    let mut summary = ScheduleSummary::default();
    loop {
        if config.max_ticks.is_some_and(|max| summary.ticks >= max) {
            break;
        }

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                ::log::info!("Shutdown requested, stopping scheduler");
                break;
            }
            _ = ticker.tick() => {}
        }

        summary.ticks += 1;
        ::log::info!("Starting job #{}", summary.ticks);
        match run_tick(source, store, notifier).await {
            Ok(outcome) => summary.record(&outcome),
            Err(e) => {
                summary.failures += 1;
                report_failure(&e);
            }
        }
    }

    log::summary(
        "Scheduler stopped",
        &[
            ("Ticks", summary.ticks.to_string()),
            ("Failures", summary.failures.to_string()),
            ("Reports saved", summary.persisted.to_string()),
            ("Emails sent", summary.notifications.to_string()),
        ],
    );
    summary
}
