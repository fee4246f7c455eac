//! Records flowing through a run: outstanding tasks in, run results out, and
//! the weekly digest snapshot.

use crate::error::{CraigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// OutstandingTask
// ---------------------------------------------------------------------------

/// One compliance item an employee has not completed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingTask {
    #[serde(alias = "email")]
    pub recipient_email: String,
    #[serde(alias = "name")]
    pub display_name: String,
    pub first_name: String,
    pub task_name: String,
    pub task_url: String,
    #[serde(default)]
    pub days_overdue: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_email: Option<String>,
}

// ---------------------------------------------------------------------------
// EscalationTier / Thresholds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationTier {
    Nudge,
    Reminder,
    Escalate,
}

impl EscalationTier {
    pub fn as_str(self) -> &'static str {
        match self {
            EscalationTier::Nudge => "nudge",
            EscalationTier::Reminder => "reminder",
            EscalationTier::Escalate => "escalate",
        }
    }
}

impl fmt::Display for EscalationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day thresholds separating the three tiers. Always `first_email_days < manager_cc_days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    first_email_days: u32,
    manager_cc_days: u32,
}

impl Thresholds {
    pub fn new(first_email_days: u32, manager_cc_days: u32) -> Result<Self> {
        if first_email_days >= manager_cc_days {
            return Err(CraigError::InvalidThresholds {
                first: first_email_days,
                manager: manager_cc_days,
            });
        }
        Ok(Self {
            first_email_days,
            manager_cc_days,
        })
    }

    pub fn first_email_days(&self) -> u32 {
        self.first_email_days
    }

    pub fn manager_cc_days(&self) -> u32 {
        self.manager_cc_days
    }

    pub fn tier_for(&self, days_overdue: u32) -> EscalationTier {
        crate::engine::classify(days_overdue, self.first_email_days, self.manager_cc_days)
    }
}

// ---------------------------------------------------------------------------
// Channel / RunResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Chat,
    Email,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Chat => "chat",
            Channel::Email => "email",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulated outcome of one daily run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub total_checked: usize,
    pub channel_counts: BTreeMap<Channel, u32>,
    pub escalations: u32,
    pub errors: Vec<String>,
}

impl RunResult {
    pub fn record_sent(&mut self, channel: Channel) {
        *self.channel_counts.entry(channel).or_insert(0) += 1;
    }

    pub fn sent(&self, channel: Channel) -> u32 {
        self.channel_counts.get(&channel).copied().unwrap_or(0)
    }

    pub fn total_sent(&self) -> u32 {
        self.channel_counts.values().sum()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

// ---------------------------------------------------------------------------
// WeeklyDigestInput
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub name: String,
    pub task: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingItem {
    pub name: String,
    pub task: String,
    pub days_overdue: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    pub name: String,
    pub date: String,
}

/// Aggregate snapshot rendered into the weekly channel post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyDigestInput {
    #[serde(default)]
    pub compliance_percentage: f64,
    /// Last week's percentage, when the source tracks it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_percentage: Option<f64>,
    #[serde(default)]
    pub completed_this_week: Vec<Completion>,
    #[serde(default)]
    pub outstanding_items: Vec<OutstandingItem>,
    #[serde(default)]
    pub upcoming_deadlines: Vec<Deadline>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
