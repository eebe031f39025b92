//! Type definitions for ClickUp tasks and the list configuration file.

use serde::{Deserialize, Serialize};

/// A task record as delivered by the source, before classification.
///
/// Timestamps are kept in their raw form (ClickUp sends epoch milliseconds
/// as decimal strings) so that a malformed value can be skipped by the
/// classifier instead of failing the whole fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTask {
    pub id: String,
    pub name: String,
    pub status: String,
    /// Due date, epoch milliseconds.
    pub due_at: Option<String>,
    /// Completion time, epoch milliseconds.
    pub completed_at: Option<String>,
    /// Assignee usernames in source order.
    pub assignees: Vec<String>,
}

/// What a list is used for. Only affects labeling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Sprint,
    Feature,
    Bug,
    #[default]
    #[serde(other)]
    General,
}

impl ListKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sprint => "sprint",
            Self::Feature => "feature",
            Self::Bug => "bug",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A list to query for tasks, as stored in the list configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDescriptor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ListKind,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub discovered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_date: Option<String>,
    /// Added by hand rather than by discovery.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub manually_added: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_date: Option<String>,
    /// Keys this version does not know about, written back unchanged.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

const fn default_enabled() -> bool {
    true
}

impl ListDescriptor {
    /// Create an enabled list descriptor.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ListKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            enabled: true,
            description: None,
            space: None,
            folder: None,
            discovered: false,
            discovery_date: None,
            manually_added: false,
            added_date: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Name used in logs and messages; falls back to the id.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("List {}", self.id)
        } else {
            self.name.clone()
        }
    }
}

/// Name filters used when discovering sprint lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySettings {
    #[serde(default = "default_include_folders")]
    pub include_folders: Vec<String>,
    #[serde(default = "default_excludes")]
    pub exclude_folders: Vec<String>,
    #[serde(default = "default_excludes")]
    pub exclude_list_names: Vec<String>,
}

fn default_include_folders() -> Vec<String> {
    ["sprint", "iteration", "pi ", "release"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_excludes() -> Vec<String> {
    ["managex", "template", "archived"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            include_folders: default_include_folders(),
            exclude_folders: default_excludes(),
            exclude_list_names: default_excludes(),
        }
    }
}

/// Contents of the list configuration file.
///
/// Unknown top-level keys are carried through untouched so that saving
/// never drops fields written by other tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default)]
    pub lists: Vec<ListDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_settings: Option<DiscoverySettings>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_descriptor_defaults() {
        let list: ListDescriptor = serde_json::from_str(r#"{"id": "901"}"#).unwrap();
        assert!(list.enabled);
        assert_eq!(list.kind, ListKind::General);
        assert_eq!(list.display_name(), "List 901");
    }

    #[test]
    fn test_unknown_kind_decodes_as_general() {
        let list: ListDescriptor =
            serde_json::from_str(r#"{"id": "1", "name": "Ops", "type": "epic"}"#).unwrap();
        assert_eq!(list.kind, ListKind::General);
    }

    #[test]
    fn test_list_config_keeps_unknown_keys() {
        let raw = r#"{"lists": [{"id": "1", "type": "sprint", "enabled": false}], "owner": "ops"}"#;
        let config: ListConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.lists[0].kind, ListKind::Sprint);
        assert!(!config.lists[0].enabled);

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["owner"], "ops");
        assert_eq!(value["lists"][0]["type"], "sprint");
        assert!(value["lists"][0].get("discovered").is_none());
    }

    #[test]
    fn test_list_descriptor_keeps_unknown_keys() {
        let raw = r#"{"id": "7", "name": "Ops", "type": "bug", "manually_added": true,
                      "added_date": "2025-01-01T00:00:00", "owner": "infra"}"#;
        let list: ListDescriptor = serde_json::from_str(raw).unwrap();
        assert!(list.manually_added);
        assert_eq!(list.added_date.as_deref(), Some("2025-01-01T00:00:00"));
        assert_eq!(list.extra["owner"], "infra");

        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(value["owner"], "infra");
        assert_eq!(value["manually_added"], true);
        assert_eq!(value["type"], "bug");
    }

    #[test]
    fn test_partial_discovery_settings_fill_defaults() {
        let settings: DiscoverySettings =
            serde_json::from_str(r#"{"exclude_folders": ["old"]}"#).unwrap();
        assert_eq!(settings.exclude_folders, vec!["old".to_string()]);
        assert_eq!(settings.include_folders.len(), 4);
        assert_eq!(settings.exclude_list_names, default_excludes());
    }
}
