//! List registry backed by the JSON list configuration file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::RegistryError;
use crate::models::{DiscoverySettings, ListConfig, ListDescriptor, ListKind};

/// Source of the lists to query on each run.
#[async_trait]
pub trait ListRegistry: Send + Sync {
    /// Lists with `enabled: true`, in configuration order.
    async fn enabled_lists(&self) -> Result<Vec<ListDescriptor>, RegistryError>;

    /// Filters for sprint discovery.
    async fn discovery_settings(&self) -> Result<DiscoverySettings, RegistryError>;

    /// Append lists whose ids are not yet known. Returns the ones added.
    async fn append_new(
        &self,
        lists: Vec<ListDescriptor>,
    ) -> Result<Vec<ListDescriptor>, RegistryError>;
}

/// Registry stored in a JSON file, with a single-list fallback for
/// setups that only configure `CLICKUP_LIST_ID`.
pub struct FileListRegistry {
    path: PathBuf,
    fallback_list_id: Option<String>,
}

impl FileListRegistry {
    pub fn new(path: impl Into<PathBuf>, fallback_list_id: Option<String>) -> Self {
        Self {
            path: path.into(),
            fallback_list_id,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the config file. `Ok(None)` when it does not exist.
    pub async fn load(&self) -> Result<Option<ListConfig>, RegistryError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(RegistryError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| RegistryError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Write the config file, pretty-printed.
    pub async fn save(&self, config: &ListConfig) -> Result<(), RegistryError> {
        let raw = serde_json::to_string_pretty(config)?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|source| RegistryError::Write {
                path: self.path.clone(),
                source,
            })
    }

    /// Every configured list, enabled or not.
    pub async fn all_lists(&self) -> Result<Vec<ListDescriptor>, RegistryError> {
        match self.load().await {
            Ok(Some(config)) => Ok(config.lists),
            Ok(None) => self.fallback(None),
            Err(e @ RegistryError::Parse { .. }) => {
                warn!(error = %e, "Failed to load list config file");
                self.fallback(Some(e))
            }
            Err(e) => Err(e),
        }
    }

    /// Flip the `enabled` flag of one list and persist it.
    pub async fn set_enabled(&self, list_id: &str, enabled: bool) -> Result<(), RegistryError> {
        let mut config = self.load().await?.unwrap_or_default();
        let list = config
            .lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or_else(|| RegistryError::UnknownList(list_id.to_string()))?;
        list.enabled = enabled;
        self.save(&config).await
    }

    /// Add a list by hand. The name defaults to `List <id>`.
    pub async fn add_manual(
        &self,
        list_id: &str,
        name: Option<String>,
        kind: ListKind,
        description: Option<String>,
    ) -> Result<ListDescriptor, RegistryError> {
        let mut config = self.load().await?.unwrap_or_default();
        if config.lists.iter().any(|l| l.id == list_id) {
            return Err(RegistryError::DuplicateList(list_id.to_string()));
        }

        let name = name.unwrap_or_else(|| format!("List {list_id}"));
        let mut list = ListDescriptor::new(list_id, name, kind);
        list.description = description;
        list.manually_added = true;
        list.added_date = Some(chrono::Utc::now().to_rfc3339());

        config.lists.push(list.clone());
        self.save(&config).await?;
        info!(list = %list.name, kind = %list.kind, "Added list manually");
        Ok(list)
    }

    fn fallback(&self, parse_error: Option<RegistryError>) -> Result<Vec<ListDescriptor>, RegistryError> {
        if let Some(id) = &self.fallback_list_id {
            info!("Using single list from CLICKUP_LIST_ID");
            return Ok(vec![ListDescriptor::new(
                id.clone(),
                "Default List",
                ListKind::General,
            )]);
        }

        Err(parse_error.unwrap_or_else(|| RegistryError::NoListsConfigured {
            path: self.path.clone(),
        }))
    }
}

#[async_trait]
impl ListRegistry for FileListRegistry {
    async fn enabled_lists(&self) -> Result<Vec<ListDescriptor>, RegistryError> {
        let lists: Vec<_> = self
            .all_lists()
            .await?
            .into_iter()
            .filter(|l| l.enabled)
            .collect();
        info!(count = lists.len(), "Found enabled lists to process");
        Ok(lists)
    }

    async fn discovery_settings(&self) -> Result<DiscoverySettings, RegistryError> {
        Ok(self
            .load()
            .await?
            .and_then(|config| config.discovery_settings)
            .unwrap_or_default())
    }

    async fn append_new(
        &self,
        lists: Vec<ListDescriptor>,
    ) -> Result<Vec<ListDescriptor>, RegistryError> {
        let mut config = self.load().await?.unwrap_or_default();
        let mut known: HashSet<String> = config.lists.iter().map(|l| l.id.clone()).collect();

        let added: Vec<ListDescriptor> = lists
            .into_iter()
            .filter(|l| known.insert(l.id.clone()))
            .collect();

        if added.is_empty() {
            info!("No new lists to add");
            return Ok(added);
        }

        config.lists.extend(added.iter().cloned());
        self.save(&config).await?;

        info!(count = added.len(), "Added new lists to configuration");
        for list in &added {
            info!(list = %list.name, kind = %list.kind, "Added list");
        }
        Ok(added)
    }
}
