use crate::output::{print_json, print_table};
use craig_core::clock::{Clock, SystemClock};
use craig_core::config::Config;
use craig_core::memory::{open_memory, DedupMemory};
use craig_core::source::open_source;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use super::RunOptions;

const PROBE_RECIPIENT: &str = "craig-selftest@localhost";
const PROBE_TASK: &str = "integration self-test";

#[derive(Debug, Serialize)]
struct Probe {
    integration: &'static str,
    passed: bool,
    detail: String,
}

impl Probe {
    fn from_result(integration: &'static str, result: anyhow::Result<String>) -> Self {
        match result {
            Ok(detail) => Probe {
                integration,
                passed: true,
                detail,
            },
            Err(e) => Probe {
                integration,
                passed: false,
                detail: format!("{e:#}"),
            },
        }
    }
}

pub fn run(root: &Path, opts: RunOptions) -> anyhow::Result<()> {
    let config = super::load_config(root, opts)?;

    let probes = vec![
        Probe::from_result("chat", probe_chat(&config)),
        Probe::from_result("email", probe_email(&config)),
        Probe::from_result("compliance source", probe_source(&config, root)),
        Probe::from_result("reminder memory", probe_memory(&config, root)),
    ];

    if opts.json {
        print_json(&probes)?;
    } else {
        let rows = probes
            .iter()
            .map(|p| {
                vec![
                    p.integration.to_string(),
                    if p.passed { "PASS" } else { "FAIL" }.to_string(),
                    p.detail.clone(),
                ]
            })
            .collect();
        print_table(&["INTEGRATION", "STATUS", "DETAIL"], rows);
    }

    let failed = probes.iter().filter(|p| !p.passed).count();
    if failed > 0 {
        anyhow::bail!("{failed} integration check(s) failed");
    }
    Ok(())
}

fn probe_chat(config: &Config) -> anyhow::Result<String> {
    Ok(super::chat_channel(config)?.probe()?)
}

fn probe_email(config: &Config) -> anyhow::Result<String> {
    Ok(super::email_channel(config)?.probe()?)
}

fn probe_source(config: &Config, root: &Path) -> anyhow::Result<String> {
    let source = open_source(&config.source, root)?;
    let tasks = source.outstanding_tasks()?;
    Ok(format!("{}: {} outstanding task(s)", source.describe(), tasks.len()))
}

/// Mark and read back a probe key. It expires with the normal reminder window.
fn probe_memory(config: &Config, root: &Path) -> anyhow::Result<String> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut memory = open_memory(&config.memory, root, clock)?;
    memory.mark(PROBE_RECIPIENT, PROBE_TASK)?;
    if !memory.has(PROBE_RECIPIENT, PROBE_TASK)? {
        anyhow::bail!("probe key was not found after marking");
    }
    let active = memory.count()?;
    Ok(format!(
        "{} backend, {active} active entr{}",
        memory.backend(),
        if active == 1 { "y" } else { "ies" }
    ))
}
