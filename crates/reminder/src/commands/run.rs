//! Run command - one reminder pass.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use notify::{DryRunSink, Sink, SlackChannel};
use pm::{ClickUpClient, FileListRegistry, SprintDiscovery};
use reminder::{
    Composer, Config, Dispatcher, MentionMapper, MentionMapping, OpenAiGenerator, RunOutcome,
    TokioPacer,
};
use tracing::{info, warn};

/// Fetch, classify and post reminders once.
#[derive(Args)]
pub struct RunCommand {
    /// Log messages instead of posting them, with no delay between them.
    #[arg(long)]
    dry_run: bool,
}

impl RunCommand {
    /// Run the reminder pass.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is incomplete or the list
    /// registry cannot be read.
    pub async fn run(&self) -> Result<()> {
        let config = Config::from_env()?;
        config.log_summary();

        let client = Arc::new(
            ClickUpClient::new(config.clickup_api_key.clone(), config.http_timeout)
                .context("Failed to create ClickUp client")?,
        );
        let registry = Arc::new(FileListRegistry::new(
            config.paths.list_config_file.clone(),
            config.paths.clickup_list_id.clone(),
        ));

        let mapping = MentionMapping::load_or_default(&config.paths.user_mapping_file);
        info!(users = mapping.user_mappings.len(), "Loaded user mappings");

        let generator = OpenAiGenerator::new(config.openai_api_key.clone(), config.http_timeout)
            .context("Failed to create OpenAI client")?
            .with_model(config.openai_model.clone());
        let composer = Composer::new(Arc::new(MentionMapper::new(mapping)), Arc::new(generator))
            .with_privileged_mention(config.privileged_mention.clone());

        let mut schedule = config.schedule.clone();
        let sink: Arc<dyn Sink> = if self.dry_run {
            info!("Dry run: messages are logged, not posted");
            schedule.pacing = Duration::ZERO;
            Arc::new(DryRunSink::new())
        } else {
            Arc::new(
                SlackChannel::new(
                    config.slack_bot_token.clone(),
                    config.slack_channel_id.clone(),
                    config.http_timeout,
                )
                .context("Failed to create Slack client")?,
            )
        };

        let pacer = TokioPacer::default();
        let cancel = pacer.cancellation_token();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, skipping remaining delays");
                cancel.cancel();
            }
        });

        let mut dispatcher = Dispatcher::new(registry, client.clone(), composer, sink)
            .with_pacer(Arc::new(pacer))
            .with_schedule(schedule);
        if let Some(team_id) = &config.clickup_team_id {
            dispatcher = dispatcher.with_discovery(Arc::new(SprintDiscovery::new(client, team_id.clone())));
        }

        match dispatcher.run(&Local::now()).await? {
            RunOutcome::SkippedNonWorkingDay(day) => {
                info!(%day, "Nothing to do today");
            }
            RunOutcome::Completed(summary) => {
                if summary.failed > 0 {
                    warn!(failed = summary.failed, sent = summary.sent, "Some reminders were not delivered");
                }
            }
        }

        Ok(())
    }
}
