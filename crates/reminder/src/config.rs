//! Runtime configuration.
//!
//! Read once from the environment at startup and passed explicitly to
//! every component. Required credentials are checked together so a
//! misconfigured deployment reports every missing name in one error.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Weekday;
use tracing::info;

use crate::ai::openai::DEFAULT_MODEL;
use crate::error::ConfigError;

/// Default list registry file.
pub const DEFAULT_LIST_CONFIG_FILE: &str = "clickup_config.json";
/// Default mention mapping file.
pub const DEFAULT_USER_MAPPING_FILE: &str = "user_mapping.json";
/// Default delay between two posted messages.
pub const DEFAULT_PACING_SECS: u64 = 180;
/// Default timeout for every outbound HTTP call.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

const REQUIRED: [&str; 4] = [
    "OPENAI_API_KEY",
    "SLACK_BOT_TOKEN",
    "SLACK_CHANNEL_ID",
    "CLICKUP_API_KEY",
];

/// File locations and the single-list fallback.
///
/// Needed by the management commands, which must work without the
/// messaging credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub list_config_file: PathBuf,
    pub user_mapping_file: PathBuf,
    pub clickup_list_id: Option<String>,
}

impl ConfigPaths {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            list_config_file: get("CLICKUP_CONFIG_FILE")
                .map_or_else(|| PathBuf::from(DEFAULT_LIST_CONFIG_FILE), PathBuf::from),
            user_mapping_file: get("USER_MAPPING_FILE")
                .map_or_else(|| PathBuf::from(DEFAULT_USER_MAPPING_FILE), PathBuf::from),
            clickup_list_id: get("CLICKUP_LIST_ID"),
        }
    }
}

/// When the bot may post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// Delay between consecutive sends.
    pub pacing: Duration,
    /// Days on which a run exits without doing anything.
    pub non_working_days: Vec<Weekday>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            pacing: Duration::from_secs(DEFAULT_PACING_SECS),
            non_working_days: vec![Weekday::Sat, Weekday::Sun],
        }
    }
}

impl Schedule {
    #[must_use]
    pub fn is_non_working(&self, day: Weekday) -> bool {
        self.non_working_days.contains(&day)
    }
}

/// Full configuration for a reminder run.
#[derive(Debug, Clone)]
pub struct Config {
    // Credentials
    pub openai_api_key: String,
    pub slack_bot_token: String,
    pub slack_channel_id: String,
    pub clickup_api_key: String,

    // ClickUp
    pub clickup_team_id: Option<String>,
    pub paths: ConfigPaths,

    // Generation
    pub openai_model: String,
    /// Mention of the assignee whose overdue reminders stay playful.
    pub privileged_mention: Option<String>,

    // Timing
    pub schedule: Schedule,
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing: Vec<String> = REQUIRED
            .into_iter()
            .filter(|&key| get(key).is_none())
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }
        let required = |key: &str| get(key).unwrap_or_default();

        let pacing_secs = parse_secs(
            "REMINDER_PACING_SECS",
            get("REMINDER_PACING_SECS"),
            DEFAULT_PACING_SECS,
        )?;
        let timeout_secs = parse_secs(
            "REMINDER_HTTP_TIMEOUT_SECS",
            get("REMINDER_HTTP_TIMEOUT_SECS"),
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "REMINDER_HTTP_TIMEOUT_SECS".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        // Set but empty means no non-working days.
        let non_working_days = match lookup("REMINDER_NON_WORKING_DAYS") {
            Some(raw) => parse_weekdays(&raw)?,
            None => Schedule::default().non_working_days,
        };

        Ok(Self {
            openai_api_key: required("OPENAI_API_KEY"),
            slack_bot_token: required("SLACK_BOT_TOKEN"),
            slack_channel_id: required("SLACK_CHANNEL_ID"),
            clickup_api_key: required("CLICKUP_API_KEY"),
            clickup_team_id: get("CLICKUP_TEAM_ID"),
            paths: ConfigPaths::from_lookup(&lookup),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            privileged_mention: get("REMINDER_PRIVILEGED_MENTION"),
            schedule: Schedule {
                pacing: Duration::from_secs(pacing_secs),
                non_working_days,
            },
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Log the effective configuration with secrets masked.
    pub fn log_summary(&self) {
        let days: Vec<String> = self
            .schedule
            .non_working_days
            .iter()
            .map(ToString::to_string)
            .collect();
        info!(
            openai_api_key = %mask(&self.openai_api_key),
            slack_bot_token = %mask(&self.slack_bot_token),
            clickup_api_key = %mask(&self.clickup_api_key),
            slack_channel = %self.slack_channel_id,
            list_config = %self.paths.list_config_file.display(),
            user_mapping = %self.paths.user_mapping_file.display(),
            fallback_list = self.paths.clickup_list_id.as_deref().unwrap_or("-"),
            team_id = self.clickup_team_id.as_deref().unwrap_or("-"),
            model = %self.openai_model,
            pacing_secs = self.schedule.pacing.as_secs(),
            non_working_days = %days.join(","),
            http_timeout_secs = self.http_timeout.as_secs(),
            privileged = self.privileged_mention.is_some(),
            "Configuration loaded"
        );
    }
}

fn parse_secs(key: &str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    raw.map_or(Ok(default), |value| {
        value.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            reason: format!("'{value}' is not a whole number of seconds"),
        })
    })
}

fn parse_weekdays(raw: &str) -> Result<Vec<Weekday>, ConfigError> {
    let mut days = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let day: Weekday = part.parse().map_err(|_| ConfigError::Invalid {
            key: "REMINDER_NON_WORKING_DAYS".to_string(),
            reason: format!("'{part}' is not a weekday"),
        })?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}

/// First four characters, then stars.
fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}****")
}
