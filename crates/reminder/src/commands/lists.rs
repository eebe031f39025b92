//! Lists command - inspect and edit the list registry.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use colored::Colorize;
use pm::{
    ClickUpClient, FileListRegistry, ListDiscovery, ListKind, ListRegistry, SprintDiscovery,
};
use reminder::config::{ConfigPaths, DEFAULT_HTTP_TIMEOUT_SECS};

use crate::ui;

/// Manage the ClickUp lists to monitor.
#[derive(Args)]
pub struct ListsCommand {
    #[command(subcommand)]
    action: ListsAction,
}

#[derive(Subcommand)]
enum ListsAction {
    /// Show every configured list.
    Show,

    /// Add a list by id.
    Add {
        /// ClickUp list id.
        list_id: String,

        /// Display name. Defaults to "List <id>".
        #[arg(long)]
        name: Option<String>,

        /// What the list holds.
        #[arg(long, value_enum, default_value_t = Kind::General)]
        kind: Kind,

        /// Free-form description.
        #[arg(long)]
        description: Option<String>,
    },

    /// Start monitoring a list.
    Enable {
        /// ClickUp list id.
        list_id: String,
    },

    /// Stop monitoring a list.
    Disable {
        /// ClickUp list id.
        list_id: String,
    },

    /// Find sprint lists in the team and add the new ones.
    Discover {
        /// ClickUp API key.
        #[arg(long, env = "CLICKUP_API_KEY", hide_env_values = true)]
        api_key: String,

        /// ClickUp team (workspace) id.
        #[arg(long, env = "CLICKUP_TEAM_ID")]
        team_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    Sprint,
    Feature,
    Bug,
    General,
}

impl From<Kind> for ListKind {
    fn from(value: Kind) -> Self {
        match value {
            Kind::Sprint => Self::Sprint,
            Kind::Feature => Self::Feature,
            Kind::Bug => Self::Bug,
            Kind::General => Self::General,
        }
    }
}

impl ListsCommand {
    pub async fn run(&self) -> Result<()> {
        let paths = ConfigPaths::from_env();
        let registry = FileListRegistry::new(paths.list_config_file, paths.clickup_list_id);

        match &self.action {
            ListsAction::Show => show(&registry).await,
            ListsAction::Add {
                list_id,
                name,
                kind,
                description,
            } => add(&registry, list_id, name.clone(), *kind, description.clone()).await,
            ListsAction::Enable { list_id } => toggle(&registry, list_id, true).await,
            ListsAction::Disable { list_id } => toggle(&registry, list_id, false).await,
            ListsAction::Discover { api_key, team_id } => discover(&registry, api_key, team_id).await,
        }
    }
}

async fn show(registry: &FileListRegistry) -> Result<()> {
    let lists = registry.all_lists().await?;
    ui::print_section(&format!("ClickUp lists ({})", registry.path().display()));

    for list in &lists {
        let status = if list.enabled {
            "enabled".green()
        } else {
            "disabled".red()
        };
        let marker = if list.discovered { " (discovered)".bright_black() } else { "".normal() };
        println!("  {} [{}] {}{}", status, list.kind, list.display_name().bold(), marker);
        ui::print_field("id", &list.id);
        if let Some(description) = &list.description {
            ui::print_field("description", description);
        }
    }

    let enabled = lists.iter().filter(|l| l.enabled).count();
    println!();
    ui::print_info(&format!("{enabled} of {} lists enabled", lists.len()));

    let settings = registry.discovery_settings().await?;
    ui::print_section("Discovery settings");
    ui::print_field("include folders", &settings.include_folders.join(", "));
    ui::print_field("exclude folders", &settings.exclude_folders.join(", "));
    ui::print_field("exclude lists", &settings.exclude_list_names.join(", "));
    Ok(())
}

async fn add(
    registry: &FileListRegistry,
    list_id: &str,
    name: Option<String>,
    kind: Kind,
    description: Option<String>,
) -> Result<()> {
    let list = registry
        .add_manual(list_id, name, kind.into(), description)
        .await
        .with_context(|| format!("Failed to add list {list_id}"))?;
    ui::print_success(&format!("Added {} ({}) as {}", list.display_name(), list.id, list.kind));
    Ok(())
}

async fn toggle(registry: &FileListRegistry, list_id: &str, enabled: bool) -> Result<()> {
    registry
        .set_enabled(list_id, enabled)
        .await
        .with_context(|| format!("Failed to update list {list_id}"))?;
    let verb = if enabled { "Enabled" } else { "Disabled" };
    ui::print_success(&format!("{verb} list {list_id}"));
    Ok(())
}

async fn discover(registry: &FileListRegistry, api_key: &str, team_id: &str) -> Result<()> {
    let client = ClickUpClient::new(api_key, Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))?;
    let discovery = SprintDiscovery::new(Arc::new(client), team_id);

    let settings = registry.discovery_settings().await?;
    let found = discovery
        .discover(&settings)
        .await
        .context("List discovery failed")?;
    ui::print_info(&format!("Found {} sprint lists", found.len()));

    let added = registry.append_new(found).await?;
    if added.is_empty() {
        ui::print_warning("No new lists to add");
    }
    for list in &added {
        ui::print_success(&format!("Added {} ({})", list.display_name(), list.id));
    }
    Ok(())
}
