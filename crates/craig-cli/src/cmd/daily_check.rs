use crate::output::{print_json, rule};
use anyhow::Context;
use craig_core::clock::{Clock, SystemClock};
use craig_core::engine::{run_daily_check, EngineSettings, EscalationEngine};
use craig_core::memory::{open_memory, DedupMemory};
use craig_core::source::open_source;
use craig_core::task::{Channel, RunResult};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use super::RunOptions;

pub fn run(root: &Path, opts: RunOptions) -> anyhow::Result<()> {
    let config = super::load_config(root, opts)?;
    let settings = EngineSettings::from_config(&config).context("invalid escalation config")?;

    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("daily_check", %run_id);
    let _guard = span.enter();

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let chat = super::chat_channel(&config)?;
    let email = super::email_channel(&config)?;
    let source = open_source(&config.source, root).context("failed to open compliance source")?;
    let mut memory =
        open_memory(&config.memory, root, clock).context("failed to open reminder memory")?;
    tracing::info!(backend = memory.backend(), "reminder memory ready");

    if !opts.json {
        println!("Starting daily compliance check for {}...", config.company.name);
    }

    let mut engine = EscalationEngine::new(settings, chat.as_ref(), email.as_ref(), &mut memory);
    let result = run_daily_check(source.as_ref(), &mut engine)
        .context("daily check failed: compliance data unavailable")?;

    if opts.json {
        print_json(&serde_json::json!({
            "run_id": run_id.to_string(),
            "dry_run": config.dry_run,
            "result": result,
        }))?;
    } else {
        print_summary(&result, config.dry_run);
    }

    if result.has_errors() {
        anyhow::bail!(
            "daily check finished with {} error(s)",
            result.errors.len()
        );
    }
    Ok(())
}

fn print_summary(result: &RunResult, dry_run: bool) {
    println!();
    println!("{}", rule());
    if dry_run {
        println!("Daily check complete (dry run, nothing was sent)");
    } else {
        println!("Daily check complete");
    }
    println!("  Tasks checked:    {}", result.total_checked);
    println!("  Chat reminders:   {}", result.sent(Channel::Chat));
    println!("  Emails:           {}", result.sent(Channel::Email));
    println!("  Escalations:      {}", result.escalations);
    if result.errors.is_empty() {
        println!("  Errors:           none");
    } else {
        println!("  Errors:           {}", result.errors.len());
        for error in &result.errors {
            println!("    - {error}");
        }
    }
    println!("{}", rule());
}
