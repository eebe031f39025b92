//! Slack Web API delivery channel.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::{Ack, Sink};
use crate::error::{DeliveryError, SlackApiError};

/// Slack Web API base URL.
const SLACK_API_URL: &str = "https://slack.com/api";

/// Retry delay assumed when Slack omits `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// Slack bot channel posting through `chat.postMessage`.
pub struct SlackChannel {
    bot_token: String,
    channel_id: String,
    base_url: String,
    client: reqwest::Client,
}

impl SlackChannel {
    /// Create a Slack channel for a bot token and target channel id.
    pub fn new(
        bot_token: impl Into<String>,
        channel_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DeliveryError> {
        let bot_token = bot_token.into();
        let channel_id = channel_id.into();

        if bot_token.is_empty() {
            return Err(DeliveryError::NotConfigured("SLACK_BOT_TOKEN".to_string()));
        }
        if channel_id.is_empty() {
            return Err(DeliveryError::NotConfigured("SLACK_CHANNEL_ID".to_string()));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            bot_token,
            channel_id,
            base_url: SLACK_API_URL.to_string(),
            client,
        })
    }

    /// Set a custom API base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Target channel id.
    #[must_use]
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }
}

#[async_trait]
impl Sink for SlackChannel {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn post(&self, text: &str) -> Result<Ack, DeliveryError> {
        let payload = PostMessage {
            channel: &self.channel_id,
            text,
            unfurl_links: false,
            unfurl_media: false,
        };

        info!(channel = %self.channel_id, "Sending message to Slack");
        debug!(channel = "slack", message = %text, "Message content");

        let response = self
            .client
            .post(format!("{}/chat.postMessage", self.base_url))
            .bearer_auth(&self.bot_token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

            warn!(
                channel = "slack",
                retry_after_secs = retry_after,
                "Rate limited by Slack"
            );

            return Err(DeliveryError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            warn!(
                channel = "slack",
                status = %status,
                body = %body,
                "Slack request failed"
            );

            return Err(DeliveryError::Other(format!(
                "Slack returned {status}: {body}"
            )));
        }

        let body: PostMessageResponse = response.json().await?;

        if body.ok {
            let ts = body.ts.unwrap_or_else(|| "unknown".to_string());
            info!(channel = "slack", ts = %ts, "Message sent successfully to Slack");
            return Ok(Ack {
                channel: body.channel.unwrap_or_else(|| self.channel_id.clone()),
                ts,
            });
        }

        let api_error = SlackApiError::from_code(body.error.as_deref().unwrap_or("unknown_error"));
        error!(channel = "slack", error = %api_error, "Slack API error");
        if let Some(hint) = api_error.hint() {
            error!(channel = "slack", "{hint}");
        }

        Err(DeliveryError::Api(api_error))
    }
}

// =============================================================================
// Slack API types
// =============================================================================

#[derive(Debug, Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
    unfurl_links: bool,
    unfurl_media: bool,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    ts: Option<String>,
}
