//! Weekly digest: one broadcast summarising completions, stragglers and
//! deadlines.

use crate::channel::ChatChannel;
use crate::clock::Clock;
use crate::error::CraigError;
use crate::source::ComplianceSource;
use crate::task::WeeklyDigestInput;
use crate::templates;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestOutcome {
    pub summary_posted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DigestOutcome {
    /// Outcome when the digest data could not be retrieved at all.
    pub fn source_failed(err: &CraigError) -> Self {
        let error = format!("Error running weekly summary: {err}");
        tracing::error!("{error}");
        Self {
            summary_posted: false,
            error: Some(error),
        }
    }
}

pub struct DigestComposer<'a> {
    chat: &'a dyn ChatChannel,
    channel: String,
    clock: Arc<dyn Clock>,
}

impl<'a> DigestComposer<'a> {
    pub fn new(chat: &'a dyn ChatChannel, channel: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            chat,
            channel: channel.into(),
            clock,
        }
    }

    pub fn compose(&self, input: &WeeklyDigestInput) -> String {
        templates::weekly_digest(
            self.clock.now().date_naive(),
            input.compliance_percentage,
            input.previous_percentage,
            &input.completed_this_week,
            &input.outstanding_items,
            &input.upcoming_deadlines,
        )
    }

    /// Fetch, compose and post. Failures are reported in the outcome, never
    /// propagated.
    pub fn run(&self, source: &dyn ComplianceSource) -> DigestOutcome {
        tracing::info!(source = %source.describe(), "gathering weekly compliance data");
        let message = match source.weekly_digest() {
            Ok(Some(input)) => self.compose(&input),
            Ok(None) => templates::digest_unavailable(self.clock.now().date_naive()),
            Err(e) => return DigestOutcome::source_failed(&e),
        };

        tracing::info!(channel = %self.channel, "posting weekly summary");
        match self.chat.post_to_channel(&self.channel, &message) {
            Ok(()) => DigestOutcome {
                summary_posted: true,
                error: None,
            },
            Err(e) => {
                let error = format!("Failed to post weekly summary to {}: {e}", self.channel);
                tracing::error!("{error}");
                DigestOutcome {
                    summary_posted: false,
                    error: Some(error),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
