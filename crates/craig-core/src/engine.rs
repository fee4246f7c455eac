//! Escalation engine: decides, per outstanding task, whether to nudge by
//! chat, remind by email, or escalate with the manager CC'd.
//!
//! Flow for one task:
//!
//! ```text
//! (recipient, task) already in memory? ── yes ──▶ skip
//!          │ no
//!          ▼
//! classify(days_overdue) ──▶ Nudge    ──▶ chat DM
//!                        ──▶ Reminder ──▶ email
//!                        ──▶ Escalate ──▶ email + manager CC
//!                                          (no manager on file: reminder + error entry)
//!          │
//!          ▼
//! sent? ── yes ──▶ count it, mark memory
//!       ── no  ──▶ record error, leave memory unmarked
//! ```
//!
//! Tasks are processed one at a time in input order.

use crate::channel::{ChatChannel, EmailChannel, EmailMessage};
use crate::config::Config;
use crate::error::Result;
use crate::memory::DedupMemory;
use crate::source::ComplianceSource;
use crate::task::{Channel, EscalationTier, OutstandingTask, RunResult, Thresholds};
use crate::templates;

/// How the manager is named in escalation emails. Org-chart lookup is out of
/// scope, so the body addresses the role.
pub const MANAGER_LABEL: &str = "your manager";

/// Tier for a task `days_overdue` days late. Lower bounds are inclusive.
pub fn classify(days_overdue: u32, first_email_days: u32, manager_cc_days: u32) -> EscalationTier {
    if days_overdue < first_email_days {
        EscalationTier::Nudge
    } else if days_overdue < manager_cc_days {
        EscalationTier::Reminder
    } else {
        EscalationTier::Escalate
    }
}

// ---------------------------------------------------------------------------
// EngineSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub thresholds: Thresholds,
    pub framework_label: String,
    pub estimated_minutes: u32,
}

impl EngineSettings {
    pub fn new(thresholds: Thresholds, framework_label: impl Into<String>) -> Self {
        Self {
            thresholds,
            framework_label: framework_label.into(),
            estimated_minutes: templates::DEFAULT_ESTIMATED_MINUTES,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.escalation.thresholds()?,
            config.company.framework_label(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What happened to one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Already notified inside the reminder window.
    Skipped,
    Sent { tier: EscalationTier, channel: Channel },
    Failed { tier: EscalationTier, channel: Channel },
}

// ---------------------------------------------------------------------------
// EscalationEngine
// ---------------------------------------------------------------------------

pub struct EscalationEngine<'a> {
    settings: EngineSettings,
    chat: &'a dyn ChatChannel,
    email: &'a dyn EmailChannel,
    memory: &'a mut dyn DedupMemory,
}

enum Dispatch {
    Chat(String),
    Email(EmailMessage),
}

impl<'a> EscalationEngine<'a> {
    pub fn new(
        settings: EngineSettings,
        chat: &'a dyn ChatChannel,
        email: &'a dyn EmailChannel,
        memory: &'a mut dyn DedupMemory,
    ) -> Self {
        Self {
            settings,
            chat,
            email,
            memory,
        }
    }

    /// Process every task in order and return the run totals.
    pub fn run(&mut self, tasks: &[OutstandingTask]) -> RunResult {
        let mut result = RunResult {
            total_checked: tasks.len(),
            ..RunResult::default()
        };
        if tasks.is_empty() {
            tracing::info!("no outstanding compliance tasks - everyone is up to date");
            return result;
        }
        for task in tasks {
            self.process(task, &mut result);
        }
        result
    }

    /// Handle one task, updating `result` in place.
    pub fn process(&mut self, task: &OutstandingTask, result: &mut RunResult) -> Outcome {
        let recipient = task.recipient_email.as_str();
        let task_name = task.task_name.as_str();

        match self.memory.has(recipient, task_name) {
            Ok(true) => {
                tracing::debug!(recipient, task = task_name, "already reminded today, skipping");
                return Outcome::Skipped;
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(recipient, task = task_name, error = %e, "reminder lookup failed, treating as not reminded");
            }
        }

        let tier = self.settings.thresholds.tier_for(task.days_overdue);
        tracing::info!(
            recipient,
            task = task_name,
            days_overdue = task.days_overdue,
            tier = %tier,
            "processing outstanding task"
        );

        let (dispatch, escalated) = self.build(task, tier, result);
        let channel = match &dispatch {
            Dispatch::Chat(_) => Channel::Chat,
            Dispatch::Email(_) => Channel::Email,
        };
        let sent = match &dispatch {
            Dispatch::Chat(text) => self.chat.send_direct(recipient, text),
            Dispatch::Email(message) => self.email.send(message),
        };

        match sent {
            Ok(()) => {
                result.record_sent(channel);
                if escalated {
                    result.escalations += 1;
                    tracing::info!(recipient, task = task_name, "escalated to manager");
                }
                if let Err(e) = self.memory.mark(recipient, task_name) {
                    tracing::warn!(recipient, task = task_name, error = %e, "could not record reminder");
                }
                Outcome::Sent { tier, channel }
            }
            Err(e) => {
                let msg = format!(
                    "Failed to remind {} ({recipient}) about {task_name}: {e}",
                    task.first_name
                );
                tracing::warn!("{msg}");
                result.errors.push(msg);
                Outcome::Failed { tier, channel }
            }
        }
    }

    /// Pick the message for `tier`. Returns the dispatch and whether it is a
    /// real escalation (manager CC'd).
    fn build(
        &self,
        task: &OutstandingTask,
        tier: EscalationTier,
        result: &mut RunResult,
    ) -> (Dispatch, bool) {
        match tier {
            EscalationTier::Nudge => (
                Dispatch::Chat(templates::chat_nudge(
                    &task.first_name,
                    &task.task_name,
                    &task.task_url,
                    task.days_overdue,
                    self.settings.estimated_minutes,
                )),
                false,
            ),
            EscalationTier::Reminder => (Dispatch::Email(self.reminder_email(task)), false),
            EscalationTier::Escalate => match task.manager_email.as_deref() {
                Some(manager) if !manager.trim().is_empty() => {
                    let body = templates::email_escalation(
                        &task.first_name,
                        MANAGER_LABEL,
                        &task.task_name,
                        &task.task_url,
                        task.days_overdue,
                    );
                    let message = EmailMessage {
                        to: task.recipient_email.clone(),
                        subject: body.subject,
                        html_body: body.html,
                        cc: vec![manager.to_string()],
                    };
                    (Dispatch::Email(message), true)
                }
                _ => {
                    let msg = format!(
                        "Cannot escalate {} for {} ({}): no manager email on file, sent a reminder instead",
                        task.task_name, task.first_name, task.recipient_email
                    );
                    tracing::warn!("{msg}");
                    result.errors.push(msg);
                    (Dispatch::Email(self.reminder_email(task)), false)
                }
            },
        }
    }

    fn reminder_email(&self, task: &OutstandingTask) -> EmailMessage {
        let body = templates::email_reminder(
            &task.first_name,
            &task.task_name,
            &task.task_url,
            task.days_overdue,
            &self.settings.framework_label,
        );
        EmailMessage {
            to: task.recipient_email.clone(),
            subject: body.subject,
            html_body: body.html,
            cc: Vec::new(),
        }
    }
}

/// Daily check: fetch outstanding tasks and run them through the engine.
///
/// A source failure is the only run-level error; per-recipient failures end
/// up in [`RunResult::errors`].
pub fn run_daily_check(
    source: &dyn ComplianceSource,
    engine: &mut EscalationEngine<'_>,
) -> Result<RunResult> {
    tracing::info!(source = %source.describe(), "querying compliance source");
    let tasks = source.outstanding_tasks()?;
    Ok(engine.run(&tasks))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
