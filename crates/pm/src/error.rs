//! Error types for the task source and list registry.

use std::path::PathBuf;

use thiserror::Error;

/// A source could not deliver its tasks.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request exceeded the configured timeout
    #[error("ClickUp request timed out")]
    Timeout,

    /// ClickUp answered with a non-success status
    #[error("ClickUp API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The response body was not what we expected
    #[error("Failed to decode ClickUp response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err)
        }
    }
}

/// The list configuration could not be read or written.
#[derive(Debug, Error)]
pub enum RegistryError {
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

    #[error("Failed to serialize list configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("No ClickUp lists configured. Set CLICKUP_LIST_ID or create {}", path.display())]
    NoListsConfigured { path: PathBuf },

    #[error("List '{0}' not found in configuration")]
    UnknownList(String),

    #[error("List '{0}' already exists in configuration")]
    DuplicateList(String),
}
