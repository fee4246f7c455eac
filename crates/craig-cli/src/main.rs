mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "craig",
    about = "Compliance reminder escalation and weekly digests",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .craig/)
    #[arg(long, global = true, env = "CRAIG_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Run the full decision path without sending anything
    #[arg(long, global = true, env = "CRAIG_DRY_RUN")]
    dry_run: bool,

    /// Verbose logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default .craig/config.yaml
    Init,

    /// Check outstanding tasks and send nudges, reminders and escalations
    DailyCheck,

    /// Post the weekly compliance digest to the compliance channel
    WeeklySummary,

    /// Ask a question about compliance status
    Query {
        /// The question, e.g. "Who needs to complete training?"
        text: Option<String>,
    },

    /// Check that chat, email, the compliance source and reminder memory work
    Test,

    /// Thank someone for completing a task
    Celebrate {
        /// Recipient email address
        email: String,
        /// First name used in the greeting
        first_name: String,
        /// Task that was completed
        task: String,
    },

    /// Inspect and validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        match &cli.command {
            Commands::DailyCheck
            | Commands::WeeklySummary
            | Commands::Test
            | Commands::Celebrate { .. } => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let opts = cmd::RunOptions {
        json: cli.json,
        dry_run: cli.dry_run,
    };

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, opts),
        Commands::DailyCheck => cmd::daily_check::run(&root, opts),
        Commands::WeeklySummary => cmd::weekly_summary::run(&root, opts),
        Commands::Query { text } => cmd::query::run(text.as_deref(), opts),
        Commands::Test => cmd::check::run(&root, opts),
        Commands::Celebrate {
            email,
            first_name,
            task,
        } => cmd::celebrate::run(&root, &email, &first_name, &task, opts),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, opts),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
