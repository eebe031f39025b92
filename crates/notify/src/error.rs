//! Error types for message delivery.

use thiserror::Error;

/// Errors that can occur when delivering a message.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Sink is not configured
    #[error("Sink not configured: {0}")]
    NotConfigured(String),

    /// The chat API answered but refused the message
    #[error("Slack API error: {0}")]
    Api(SlackApiError),

    /// Rate limited by the service
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Error codes returned by the Slack Web API in `{"ok": false}` bodies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlackApiError {
    #[error("channel_not_found")]
    ChannelNotFound,
    #[error("not_in_channel")]
    NotInChannel,
    #[error("invalid_auth")]
    InvalidAuth,
    #[error("missing_scope")]
    MissingScope,
    #[error("rate_limited")]
    RateLimited,
    #[error("{0}")]
    Other(String),
}

impl SlackApiError {
    /// Decode a Slack error code.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "channel_not_found" => Self::ChannelNotFound,
            "not_in_channel" => Self::NotInChannel,
            "invalid_auth" | "not_authed" | "token_revoked" => Self::InvalidAuth,
            "missing_scope" => Self::MissingScope,
            "rate_limited" | "ratelimited" => Self::RateLimited,
            other => Self::Other(other.to_string()),
        }
    }

    /// Operator-facing hint for fixing the failure, when one is known.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ChannelNotFound => Some("Channel not found - check SLACK_CHANNEL_ID"),
            Self::NotInChannel => Some("Bot is not in the channel - invite the bot to the channel"),
            Self::InvalidAuth => Some("Invalid authentication - check SLACK_BOT_TOKEN"),
            Self::MissingScope => Some("Missing required OAuth scopes - check bot permissions"),
            Self::RateLimited => Some("Rate limited by Slack API - wait before retrying"),
            Self::Other(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_decode() {
        assert_eq!(
            SlackApiError::from_code("channel_not_found"),
            SlackApiError::ChannelNotFound
        );
        assert_eq!(
            SlackApiError::from_code("ratelimited"),
            SlackApiError::RateLimited
        );
        assert_eq!(
            SlackApiError::from_code("token_revoked"),
            SlackApiError::InvalidAuth
        );
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        let err = SlackApiError::from_code("msg_too_long");
        assert_eq!(err, SlackApiError::Other("msg_too_long".to_string()));
        assert_eq!(err.to_string(), "msg_too_long");
        assert!(err.hint().is_none());
    }

    #[test]
    fn test_delivery_error_display() {
        let err = DeliveryError::Api(SlackApiError::NotInChannel);
        assert_eq!(err.to_string(), "Slack API error: not_in_channel");
    }
}
