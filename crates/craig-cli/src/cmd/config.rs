use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use craig_core::config::{Config, MemorySettings, SourceSettings, WarnLevel};
use craig_core::task::Thresholds;
use std::path::Path;

use super::RunOptions;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Validate the config for common mistakes
    Validate,

    /// Set the escalation thresholds (days overdue)
    SetThresholds {
        /// Days overdue at which the reminder email starts
        #[arg(long)]
        first_email: u32,
        /// Days overdue at which the manager is CC'd
        #[arg(long)]
        manager_cc: u32,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, opts: RunOptions) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, opts),
        ConfigSubcommand::Validate => validate(root, opts.json),
        ConfigSubcommand::SetThresholds {
            first_email,
            manager_cc,
        } => set_thresholds(root, first_email, manager_cc),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, opts: RunOptions) -> anyhow::Result<()> {
    let config = super::load_config(root, opts)?;

    if opts.json {
        return print_json(&config);
    }

    let escalation = &config.escalation;
    println!("Company:      {} ({})", config.company.name, config.company.framework_label());
    println!(
        "Escalation:   chat below day {first}, email from day {first}, manager CC from day {manager}",
        first = escalation.first_email_days,
        manager = escalation.manager_cc_days,
    );
    println!("Slack:        {} via {}", config.slack.channel, config.slack.api_base);
    println!(
        "Email:        {} <{}> via {}",
        config.email.from_name, config.email.from_address, config.email.api_base
    );
    println!("Source:       {}", source_display(&config.source));
    println!("Memory:       {}", memory_display(&config.memory));
    println!("Dry run:      {}", if config.dry_run { "yes" } else { "no" });
    Ok(())
}

fn source_display(source: &SourceSettings) -> String {
    match source {
        SourceSettings::Http { base_url } => format!("http ({base_url})"),
        SourceSettings::Fixture { path } => format!("fixture ({})", path.display()),
    }
}

fn memory_display(memory: &MemorySettings) -> String {
    match memory {
        MemorySettings::Volatile => "volatile (per process)".to_string(),
        MemorySettings::Durable { path: Some(p) } => format!("durable ({})", p.display()),
        MemorySettings::Durable { path: None } => "durable (default path)".to_string(),
    }
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);
    if has_errors {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// set-thresholds
// ---------------------------------------------------------------------------

fn set_thresholds(root: &Path, first_email: u32, manager_cc: u32) -> anyhow::Result<()> {
    let thresholds = Thresholds::new(first_email, manager_cc)?;
    let mut config = Config::load(root).context("failed to load config")?;
    config.escalation.first_email_days = thresholds.first_email_days();
    config.escalation.manager_cc_days = thresholds.manager_cc_days();
    config.save(root).context("failed to save config")?;
    println!("Escalation thresholds set: email from day {first_email}, manager CC from day {manager_cc}.");
    Ok(())
}
