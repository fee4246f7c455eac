use crate::output::print_json;
use craig_core::clock::{Clock, SystemClock};
use craig_core::digest::{DigestComposer, DigestOutcome};
use craig_core::source::open_source;
use std::path::Path;
use std::sync::Arc;

use super::RunOptions;

pub fn run(root: &Path, opts: RunOptions) -> anyhow::Result<()> {
    let config = super::load_config(root, opts)?;
    let chat = super::chat_channel(&config)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let composer = DigestComposer::new(chat.as_ref(), config.slack.channel.clone(), clock);
    let outcome = match open_source(&config.source, root) {
        Ok(source) => composer.run(source.as_ref()),
        Err(e) => DigestOutcome::source_failed(&e),
    };

    if opts.json {
        print_json(&outcome)?;
    } else if outcome.summary_posted {
        let target = if config.dry_run {
            "composed (dry run) for"
        } else {
            "posted to"
        };
        println!("Weekly summary {target} {}", config.slack.channel);
    }

    match outcome.error {
        Some(error) => anyhow::bail!("{error}"),
        None if !outcome.summary_posted => anyhow::bail!("weekly summary was not posted"),
        None => Ok(()),
    }
}
