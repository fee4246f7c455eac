pub mod celebrate;
pub mod check;
pub mod config;
pub mod daily_check;
pub mod init;
pub mod query;
pub mod weekly_summary;

use anyhow::Context;
use craig_core::channel::{
    ChatChannel, DryRunChat, DryRunEmail, EmailChannel, SendGridClient, SlackClient,
};
use craig_core::config::Config;
use std::path::Path;

/// Flags shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub json: bool,
    pub dry_run: bool,
}

/// Load `.craig/config.yaml`, folding the `--dry-run` flag into `config.dry_run`.
pub(crate) fn load_config(root: &Path, opts: RunOptions) -> anyhow::Result<Config> {
    let mut config = Config::load(root).context("failed to load config")?;
    config.dry_run |= opts.dry_run;
    if config.dry_run {
        tracing::info!("dry run: no messages will be sent");
    }
    Ok(config)
}

pub(crate) fn chat_channel(config: &Config) -> anyhow::Result<Box<dyn ChatChannel>> {
    if config.dry_run {
        return Ok(Box::new(DryRunChat));
    }
    let client = SlackClient::from_config(&config.slack).context("failed to set up Slack")?;
    Ok(Box::new(client))
}

pub(crate) fn email_channel(config: &Config) -> anyhow::Result<Box<dyn EmailChannel>> {
    if config.dry_run {
        return Ok(Box::new(DryRunEmail));
    }
    let client =
        SendGridClient::from_config(&config.email).context("failed to set up SendGrid")?;
    Ok(Box::new(client))
}
