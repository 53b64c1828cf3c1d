//! Pipeline entry points for report watching.
//!
//! - `fingerprint`: Hash a report's normalized text
//! - `detect_change`: Compare a new digest with the persisted one
//! - `run_tick`: Fetch, compare, then persist and notify as needed
//! - `run_scheduler`: Run ticks on a fixed interval

pub mod detect;
pub mod digest;
pub mod schedule;
pub mod tick;

#[cfg(test)]
pub(crate) mod testing;

pub use detect::{Detection, detect_change};
pub use digest::{digest_text, fingerprint, normalize_text};
pub use schedule::{ScheduleSummary, run_scheduler};
pub use tick::{TickOutcome, report_failure, run_tick};
