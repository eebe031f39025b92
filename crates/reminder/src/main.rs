//! Task reminder bot CLI.
//!
//! `reminder run` performs one reminder pass and exits; schedule it with
//! cron or a systemd timer. The `lists` and `users` commands manage the
//! two JSON configuration files.

#![allow(clippy::doc_markdown)]

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod ui;

use commands::lists::ListsCommand;
use commands::run::RunCommand;
use commands::users::UsersCommand;

/// ClickUp task reminders for Slack.
#[derive(Parser)]
#[command(
    name = "reminder",
    version,
    about = "Post ClickUp task reminders to Slack",
    long_about = "Fetch tasks from the configured ClickUp lists, write a short reminder\n\
                  for each task that needs attention and post it to Slack.\n\n\
                  Configuration is read from the environment (and a .env file)."
)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one reminder pass.
    Run(RunCommand),

    /// Manage the ClickUp lists to monitor.
    Lists(ListsCommand),

    /// Manage ClickUp to Slack user mappings.
    Users(UsersCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    match cli.log_format {
        LogFormat::Text => registry.with(fmt::layer().with_target(false)).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }

    match cli.command {
        Commands::Run(cmd) => cmd.run().await,
        Commands::Lists(cmd) => cmd.run().await,
        Commands::Users(cmd) => cmd.run(),
    }
}
