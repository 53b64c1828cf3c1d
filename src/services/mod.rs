//! Service layer for the report watcher.
//!
//! This module contains the I/O collaborators of a tick:
//! - Report fetching from the student portal (`PortalClient`)
//! - Change notification by mail (`SmtpNotifier`)

mod mailer;
mod portal;

pub use mailer::{ATTACHMENT_NAME, ATTACHMENT_TYPE, Notifier, SmtpNotifier, compose_message};
pub use portal::{PortalClient, ReportSource, hidden_form_fields};
