//! Project management side of the reminder bot.
//!
//! This crate provides:
//! - [`TaskSource`] and its ClickUp implementation ([`ClickUpClient`])
//! - [`ListRegistry`] backed by the JSON list configuration file
//! - Sprint list discovery across a ClickUp team ([`SprintDiscovery`])
//! - Type definitions for raw tasks and list descriptors
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use pm::{ClickUpClient, FileListRegistry, ListRegistry, TaskSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ClickUpClient::new("pk_123", Duration::from_secs(30))?;
//! let registry = FileListRegistry::new("clickup_config.json", None);
//!
//! for list in registry.enabled_lists().await? {
//!     let tasks = client.fetch(&list).await?;
//!     println!("{}: {} tasks", list.display_name(), tasks.len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Every API call can fail

pub mod client;
pub mod discovery;
pub mod error;
pub mod models;
pub mod registry;

use async_trait::async_trait;

pub use client::ClickUpClient;
pub use discovery::{ListDiscovery, SprintDiscovery};
pub use error::{RegistryError, SourceError};
pub use models::{DiscoverySettings, ListConfig, ListDescriptor, ListKind, RawTask};
pub use registry::{FileListRegistry, ListRegistry};

/// A system that returns raw task records for a list.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Fetch every task currently in `list`.
    async fn fetch(&self, list: &ListDescriptor) -> Result<Vec<RawTask>, SourceError>;
}
