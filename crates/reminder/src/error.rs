//! Error types for the reminder pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration problems detected at startup. Always fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("Invalid configuration value for '{key}': {reason}")]
    Invalid { key: String, reason: String },
}

/// The generation backend could not produce text.
///
/// Never escapes the composer; it always falls back to canned text.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generation backend not configured: {0}")]
    NotConfigured(String),

    #[error("Generation request failed: {0}")]
    Request(String),

    #[error("Generation request timed out")]
    Timeout,

    #[error("Generation API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse generation response: {0}")]
    Parse(String),

    #[error("Generation backend returned no text")]
    EmptyResponse,
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// The mention mapping file could not be read or written.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize mappings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A run could not start processing tasks.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to load list configuration: {0}")]
    Registry(#[from] pm::RegistryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_lists_every_name() {
        let err = ConfigError::Missing(vec![
            "OPENAI_API_KEY".to_string(),
            "SLACK_BOT_TOKEN".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: OPENAI_API_KEY, SLACK_BOT_TOKEN"
        );
    }

    #[test]
    fn test_generation_error_display() {
        let err = GenerationError::Api {
            status: 429,
            message: "quota".to_string(),
        };
        assert_eq!(err.to_string(), "Generation API error (429): quota");
    }
}
