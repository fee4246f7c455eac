//! Message bodies for every notification craig sends.
//!
//! Everything here is pure formatting: no I/O, no clock reads. Chat forms
//! return the message text; email forms return an [`EmailBody`].

use crate::task::{Completion, Deadline, OutstandingItem};
use chrono::NaiveDate;

/// Completed names shown in the digest before collapsing into "+N others".
pub const DIGEST_PREVIEW_NAMES: usize = 5;

/// Outstanding items overdue by more than this many days get the red marker.
pub const DIGEST_SEVERE_DAYS: u32 = 10;

pub const DEFAULT_ESTIMATED_MINUTES: u32 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailBody {
    pub subject: String,
    pub html: String,
}

fn days(n: u32) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{n} days")
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Direct-message nudge. Tone sharpens as the task ages.
pub fn chat_nudge(
    name: &str,
    task: &str,
    url: &str,
    days_overdue: u32,
    estimated_minutes: u32,
) -> String {
    let (tone, status) = match days_overdue {
        0 => ("Just a friendly reminder", "is due today".to_string()),
        1..=3 => ("Quick heads up", format!("is {} overdue", days(days_overdue))),
        _ => ("Important reminder", format!("is {} overdue", days(days_overdue))),
    };

    format!(
        "Hey {name}! {tone} - your {task} {status}.\n\n\
         It takes about {estimated_minutes} minutes. Can you knock it out today?\n\n\
         {url}\n\n\
         Let me know if you have any questions! 🎯"
    )
}

pub fn celebration(name: &str, task: &str) -> String {
    format!(
        "Hey {name}! 🎉\n\n\
         Just saw you completed your {task} - thank you! ✅\n\n\
         One less thing to worry about. Really appreciate you staying on top of it!"
    )
}

// ---------------------------------------------------------------------------
// Email
// ---------------------------------------------------------------------------

pub fn email_reminder(
    name: &str,
    task: &str,
    url: &str,
    days_overdue: u32,
    framework_label: &str,
) -> EmailBody {
    let subject = format!("Compliance Reminder: {task}");
    let (name, task, url, framework) = (
        escape_html(name),
        escape_html(task),
        escape_html(url),
        escape_html(framework_label),
    );
    let overdue = days(days_overdue);

    let html = format!(
        r#"<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
  <p>Hi {name},</p>
  <p>Your <strong>{task}</strong> is now <strong>{overdue} overdue</strong>.
  This is required for our {framework} compliance and needs to be completed ASAP.</p>
  <p>
    <a href="{url}" style="display: inline-block; padding: 12px 24px; background-color: #007bff; color: white; text-decoration: none; border-radius: 4px; margin: 10px 0;">Complete {task}</a>
  </p>
  <p>If you're running into any issues, just reply to this email and I'll help troubleshoot.</p>
  <p>Thanks,<br>Craig</p>
  <hr style="border: none; border-top: 1px solid #eee; margin: 20px 0;">
  <p style="font-size: 12px; color: #666;">This is an automated reminder from Craig, your Compliance Manager.</p>
</body>
</html>
"#
    );

    EmailBody { subject, html }
}

/// Escalation email. The caller CCs the manager; the body says so.
pub fn email_escalation(
    name: &str,
    manager_label: &str,
    task: &str,
    url: &str,
    days_overdue: u32,
) -> EmailBody {
    let subject = format!("URGENT: {task} - {days_overdue} Days Overdue");
    let (name, manager, task, url) = (
        escape_html(name),
        escape_html(manager_label),
        escape_html(task),
        escape_html(url),
    );
    let overdue = days(days_overdue);

    let html = format!(
        r#"<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
  <p>Hi {name},</p>
  <p>Your <strong>{task}</strong> is now <strong style="color: #dc3545;">{overdue} overdue</strong>,
  which is impacting our compliance audit timeline.</p>
  <p>I'm looping in {manager} to help prioritize this.</p>
  <p>
    <a href="{url}" style="display: inline-block; padding: 12px 24px; background-color: #dc3545; color: white; text-decoration: none; border-radius: 4px; margin: 10px 0;">Complete {task} Now</a>
  </p>
  <p>If there are any blockers preventing you from completing this, let's get them resolved immediately.</p>
  <p>Thanks,<br>Craig</p>
  <hr style="border: none; border-top: 1px solid #eee; margin: 20px 0;">
  <p style="font-size: 12px; color: #666;">This is an escalated reminder from Craig, your Compliance Manager.</p>
</body>
</html>
"#
    );

    EmailBody { subject, html }
}

// ---------------------------------------------------------------------------
// Weekly digest
// ---------------------------------------------------------------------------

pub fn weekly_digest(
    as_of: NaiveDate,
    compliance_pct: f64,
    previous_pct: Option<f64>,
    completed: &[Completion],
    outstanding: &[OutstandingItem],
    upcoming: &[Deadline],
) -> String {
    let today = as_of.format("%B %d, %Y");

    let completed_section = if completed.is_empty() {
        "- No completions this week".to_string()
    } else {
        let mut names = completed
            .iter()
            .take(DIGEST_PREVIEW_NAMES)
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        if completed.len() > DIGEST_PREVIEW_NAMES {
            names.push_str(&format!(
                ", and {} others",
                completed.len() - DIGEST_PREVIEW_NAMES
            ));
        }
        format!(
            "- *{} employees* completed compliance tasks ({names})",
            completed.len()
        )
    };

    let trend = match previous_pct {
        Some(prev) if prev > compliance_pct => format!(" (down from {prev:.1}%)"),
        Some(prev) if prev < compliance_pct => format!(" (up from {prev:.1}%)"),
        Some(_) => " (unchanged)".to_string(),
        None => String::new(),
    };

    let outstanding_section = if outstanding.is_empty() {
        "✅ No outstanding items!".to_string()
    } else {
        outstanding
            .iter()
            .map(|item| {
                let marker = if item.days_overdue > DIGEST_SEVERE_DAYS {
                    "🔴"
                } else {
                    "⚠️"
                };
                format!(
                    "- {} - {} ({} overdue) {marker}",
                    item.name,
                    item.task,
                    days(item.days_overdue)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let deadlines_section = if upcoming.is_empty() {
        "- None scheduled".to_string()
    } else {
        upcoming
            .iter()
            .map(|d| format!("- {}: {}", d.name, d.date))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "📊 *Weekly Compliance Update - {today}*\n\n\
         Hey team! Here's our compliance status heading into the weekend:\n\n\
         *🎉 This Week's Wins:*\n\
         {completed_section}\n\
         - Overall compliance: {compliance_pct:.1}%{trend} 📈\n\n\
         *⚠️ Still Outstanding ({} items):*\n\
         {outstanding_section}\n\n\
         *📅 Upcoming Deadlines:*\n\
         {deadlines_section}\n\n\
         I'll continue monitoring and sending reminders. If anyone is blocked, just ping me and I'll help troubleshoot!\n\n\
         Have a great weekend! 🚀",
        outstanding.len()
    )
}

/// Posted instead of the digest when the source has nothing for this week.
pub fn digest_unavailable(as_of: NaiveDate) -> String {
    format!(
        "📊 *Weekly Compliance Update - {}*\n\nNo data available this week.",
        as_of.format("%B %d, %Y")
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
