//! Users command - ClickUp to Slack mention mappings.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use colored::Colorize;
use reminder::config::ConfigPaths;
use reminder::{FallbackBehavior, MentionMapper, MentionMapping};

use crate::ui;

/// Manage ClickUp to Slack user mappings.
#[derive(Args)]
pub struct UsersCommand {
    #[command(subcommand)]
    action: UsersAction,
}

#[derive(Subcommand)]
enum UsersAction {
    /// Show the current mappings and fallback settings.
    Show,

    /// Add or replace a mapping.
    Add {
        /// ClickUp username.
        user: String,
        /// Slack member id (U...), @name, or <@ID>.
        mention: String,
    },

    /// Show the mention a ClickUp username resolves to.
    Test {
        /// ClickUp username.
        user: String,
    },

    /// Change what unmapped users resolve to.
    Settings {
        /// Fallback for unmapped users.
        #[arg(long, value_enum)]
        fallback: Option<Fallback>,

        /// Mention used for unassigned tasks and the use-default fallback.
        #[arg(long)]
        default_mention: Option<String>,
    },

    /// Import `clickup_user=slack_user` lines from a file, or `-` for stdin.
    Import {
        /// Input file.
        source: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Fallback {
    UseClickupName,
    UseDefault,
}

impl From<Fallback> for FallbackBehavior {
    fn from(value: Fallback) -> Self {
        match value {
            Fallback::UseClickupName => Self::UseSourceName,
            Fallback::UseDefault => Self::UseDefault,
        }
    }
}

impl UsersCommand {
    pub fn run(&self) -> Result<()> {
        let path = ConfigPaths::from_env().user_mapping_file;
        let mut mapping = MentionMapping::load(&path)?;

        match &self.action {
            UsersAction::Show => {
                show(&mapping, &path);
                return Ok(());
            }
            UsersAction::Test { user } => {
                let resolved = MentionMapper::new(mapping.clone()).resolve_one(user);
                let source = if mapping.user_mappings.contains_key(user) {
                    "mapped".green()
                } else {
                    mapping.fallback_behavior.as_str().yellow()
                };
                println!("  {} → {} ({})", user.bold(), resolved, source);
                return Ok(());
            }
            UsersAction::Add { user, mention } => {
                mapping.insert(user.clone(), mention.clone());
                ui::print_success(&format!("Mapped {user} → {mention}"));
            }
            UsersAction::Settings {
                fallback,
                default_mention,
            } => {
                if fallback.is_none() && default_mention.is_none() {
                    ui::print_warning("Nothing to change; pass --fallback or --default-mention");
                    return Ok(());
                }
                if let Some(fallback) = fallback {
                    mapping.fallback_behavior = (*fallback).into();
                }
                if let Some(default_mention) = default_mention {
                    mapping.default_mention.clone_from(default_mention);
                }
                ui::print_success(&format!(
                    "Fallback: {}, default mention: {}",
                    mapping.fallback_behavior.as_str(),
                    mapping.default_mention
                ));
            }
            UsersAction::Import { source } => {
                let input = read_source(source)?;
                let report = mapping.import_lines(&input);
                for line in &report.rejected {
                    ui::print_warning(&format!("Skipped invalid line: {line}"));
                }
                ui::print_success(&format!("Imported {} mappings", report.added));
            }
        }

        mapping.save(&path)?;
        ui::print_info(&format!("Saved {}", path.display()));
        Ok(())
    }
}

fn show(mapping: &MentionMapping, path: &Path) {
    ui::print_section(&format!("User mappings ({})", path.display()));
    if mapping.user_mappings.is_empty() {
        ui::print_warning("No user mappings configured");
    }
    for (user, mention) in &mapping.user_mappings {
        println!("  {:<20} → {}", user.bold(), mention);
    }

    ui::print_section("Settings");
    ui::print_field("fallback", mapping.fallback_behavior.as_str());
    ui::print_field("default mention", &mapping.default_mention);
}

fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read stdin")?;
        return Ok(input);
    }
    std::fs::read_to_string(source).with_context(|| format!("Failed to read {source}"))
}
