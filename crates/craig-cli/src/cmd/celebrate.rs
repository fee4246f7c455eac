use crate::output::print_json;
use anyhow::Context;
use craig_core::templates;
use std::path::Path;

use super::RunOptions;

pub fn run(
    root: &Path,
    email: &str,
    first_name: &str,
    task: &str,
    opts: RunOptions,
) -> anyhow::Result<()> {
    let config = super::load_config(root, opts)?;
    let chat = super::chat_channel(&config)?;

    let message = templates::celebration(first_name, task);
    chat.send_direct(email, &message)
        .with_context(|| format!("failed to send celebration to {email}"))?;
    tracing::info!(recipient = email, task, "celebration sent");

    if opts.json {
        print_json(&serde_json::json!({
            "recipient": email,
            "task": task,
            "sent": true,
            "dry_run": config.dry_run,
        }))?;
    } else {
        println!("Celebrated {first_name} ({email}) for completing {task}");
    }
    Ok(())
}
