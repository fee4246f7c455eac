//! Outbound notification channels.
//!
//! The engine only sees the [`ChatChannel`] and [`EmailChannel`] traits.
//! Real deliveries go through [`SlackClient`] and [`SendGridClient`]; dry runs
//! swap in [`DryRunChat`] / [`DryRunEmail`], which log the intended send and
//! report success.

pub mod dry_run;
pub mod sendgrid;
pub mod slack;

pub use dry_run::{DryRunChat, DryRunEmail};
pub use sendgrid::SendGridClient;
pub use slack::SlackClient;

use crate::error::Result;
use std::time::Duration;

/// Network timeout for every outbound HTTP call.
pub(crate) const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub trait ChatChannel {
    /// Direct message to the person behind `recipient` (an email address).
    fn send_direct(&self, recipient: &str, text: &str) -> Result<()>;

    /// Broadcast to a channel such as `#compliance-updates`.
    fn post_to_channel(&self, channel: &str, text: &str) -> Result<()>;

    /// Cheap connectivity check. Returns a short description of the identity.
    fn probe(&self) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub cc: Vec<String>,
}

pub trait EmailChannel {
    fn send(&self, message: &EmailMessage) -> Result<()>;

    fn probe(&self) -> Result<String>;
}

/// First 100 characters of a message, for logs.
pub(crate) fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(100).collect();
    if text.chars().count() > 100 {
        out.push_str("...");
    }
    out
}
