use super::{preview, ChatChannel, EmailChannel, EmailMessage};
use crate::error::Result;

/// Chat channel that only logs what it would have sent.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunChat;

impl ChatChannel for DryRunChat {
    fn send_direct(&self, recipient: &str, text: &str) -> Result<()> {
        tracing::info!(recipient, preview = %preview(text), "[dry run] would send chat DM");
        Ok(())
    }

    fn post_to_channel(&self, channel: &str, text: &str) -> Result<()> {
        tracing::info!(channel, preview = %preview(text), "[dry run] would post to channel");
        Ok(())
    }

    fn probe(&self) -> Result<String> {
        Ok("dry run (no workspace contacted)".to_string())
    }
}

/// Email channel that only logs what it would have sent.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunEmail;

impl EmailChannel for DryRunEmail {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            cc = %message.cc.join(", "),
            preview = %preview(&message.html_body),
            "[dry run] would send email"
        );
        Ok(())
    }

    fn probe(&self) -> Result<String> {
        Ok("dry run (no mail provider contacted)".to_string())
    }
}
