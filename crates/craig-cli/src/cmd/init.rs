use crate::output::print_json;
use anyhow::Context;
use craig_core::{config::Config, paths};
use std::path::Path;

use super::RunOptions;

pub fn run(root: &Path, opts: RunOptions) -> anyhow::Result<()> {
    let created = Config::init(root).context("failed to write default config")?;
    let path = paths::config_path(root);

    if opts.json {
        return print_json(&serde_json::json!({
            "config": path.display().to_string(),
            "created": created,
        }));
    }

    if created {
        println!("Created {}", path.display());
        println!();
        println!("Next steps:");
        println!("  1. Set company, escalation thresholds and source in the config");
        println!("  2. Export SLACK_BOT_TOKEN, SENDGRID_API_KEY and COMPLIANCE_API_TOKEN");
        println!("  3. Run 'craig test' to check the integrations");
    } else {
        println!("{} already exists, left unchanged.", path.display());
    }
    Ok(())
}
