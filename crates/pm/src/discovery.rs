//! Sprint list discovery.
//!
//! Walks a ClickUp team's spaces and folders and collects the lists that
//! live in sprint-like folders. A failure on one space or folder is logged
//! and skipped; only a failure to enumerate the spaces is returned.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::client::ClickUpClient;
use crate::error::SourceError;
use crate::models::{DiscoverySettings, ListDescriptor, ListKind};

/// Folder name fragments that mark a sprint folder.
const SPRINT_INDICATORS: &[&str] = &[
    "sprint",
    "iteration",
    "pi ",
    "program increment",
    "release",
    "milestone",
    "cycle",
    "wave",
];

/// Something that can find new lists to add to the registry.
#[async_trait]
pub trait ListDiscovery: Send + Sync {
    async fn discover(
        &self,
        settings: &DiscoverySettings,
    ) -> Result<Vec<ListDescriptor>, SourceError>;
}

/// Discovers sprint lists across one ClickUp team.
pub struct SprintDiscovery {
    client: Arc<ClickUpClient>,
    team_id: String,
}

impl SprintDiscovery {
    pub fn new(client: Arc<ClickUpClient>, team_id: impl Into<String>) -> Self {
        Self {
            client,
            team_id: team_id.into(),
        }
    }
}

#[async_trait]
impl ListDiscovery for SprintDiscovery {
    async fn discover(
        &self,
        settings: &DiscoverySettings,
    ) -> Result<Vec<ListDescriptor>, SourceError> {
        self.client
            .discover_sprint_lists(&self.team_id, settings)
            .await
    }
}

impl ClickUpClient {
    /// Find every list inside a sprint-like folder of the team.
    pub async fn discover_sprint_lists(
        &self,
        team_id: &str,
        settings: &DiscoverySettings,
    ) -> Result<Vec<ListDescriptor>, SourceError> {
        info!(team_id, "Discovering sprint lists");
        debug!(
            include_folders = ?settings.include_folders,
            exclude_folders = ?settings.exclude_folders,
            exclude_list_names = ?settings.exclude_list_names,
            "Using discovery filters"
        );

        let spaces: SpacesResponse = self
            .get_json(&format!("/team/{team_id}/space"), &[])
            .await?;
        info!(count = spaces.spaces.len(), "Found spaces");

        let discovery_date = chrono::Utc::now().to_rfc3339();
        let mut found = Vec::new();

        for space in spaces.spaces {
            if matches_any(&space.name, &settings.exclude_folders) {
                info!(space = %space.name, "Excluding space");
                continue;
            }

            let folders: FoldersResponse = match self
                .get_json(&format!("/space/{}/folder", space.id), &[])
                .await
            {
                Ok(folders) => folders,
                Err(e) => {
                    warn!(space = %space.name, error = %e, "Failed to get folders");
                    continue;
                }
            };

            for folder in folders.folders {
                if matches_any(&folder.name, &settings.exclude_folders) {
                    debug!(folder = %folder.name, "Excluding folder");
                    continue;
                }
                if !is_sprint_folder(&folder.name, &settings.include_folders) {
                    continue;
                }

                let lists: ListsResponse = match self
                    .get_json(&format!("/folder/{}/list", folder.id), &[])
                    .await
                {
                    Ok(lists) => lists,
                    Err(e) => {
                        warn!(folder = %folder.name, error = %e, "Failed to get lists");
                        continue;
                    }
                };

                for list in lists.lists {
                    let full_name = format!("{} - {} - {}", space.name, folder.name, list.name);
                    if matches_any(&full_name, &settings.exclude_list_names) {
                        debug!(list = %full_name, "Excluding list");
                        continue;
                    }

                    debug!(list = %full_name, "Added sprint list");
                    let mut descriptor = ListDescriptor::new(list.id, full_name, ListKind::Sprint);
                    descriptor.space = Some(space.name.clone());
                    descriptor.folder = Some(folder.name.clone());
                    descriptor.discovered = true;
                    descriptor.discovery_date = Some(discovery_date.clone());
                    found.push(descriptor);
                }
            }
        }

        info!(count = found.len(), "Discovered sprint lists (after filtering)");
        Ok(found)
    }
}

/// Case-insensitive substring match against any pattern.
#[must_use]
pub fn matches_any(name: &str, patterns: &[String]) -> bool {
    let name = name.to_lowercase();
    patterns
        .iter()
        .any(|pattern| name.contains(&pattern.to_lowercase()))
}

/// Whether a folder name looks like it holds sprints.
#[must_use]
pub fn is_sprint_folder(name: &str, include_folders: &[String]) -> bool {
    let lower = name.to_lowercase();
    SPRINT_INDICATORS
        .iter()
        .any(|indicator| lower.contains(indicator))
        || matches_any(name, include_folders)
}

// =============================================================================
// ClickUp API types
// =============================================================================

#[derive(Debug, Deserialize)]
struct SpacesResponse {
    #[serde(default)]
    spaces: Vec<Named>,
}

#[derive(Debug, Deserialize)]
struct FoldersResponse {
    #[serde(default)]
    folders: Vec<Named>,
}

#[derive(Debug, Deserialize)]
struct ListsResponse {
    #[serde(default)]
    lists: Vec<Named>,
}

#[derive(Debug, Deserialize)]
struct Named {
    id: String,
    #[serde(default)]
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_is_sprint_folder() {
        let include = strings(&["sprint"]);
        assert!(is_sprint_folder("Sprint Folder", &include));
        assert!(is_sprint_folder("Q3 Release Train", &[]));
        assert!(is_sprint_folder("PI 24.3", &[]));
        assert!(!is_sprint_folder("Marketing", &[]));
        assert!(is_sprint_folder("Roadmap", &strings(&["road"])));
    }

    #[test]
    fn test_matches_any_is_case_insensitive() {
        assert!(matches_any("ManageX Sprints", &strings(&["managex"])));
        assert!(!matches_any("Engineering", &strings(&["managex", "template"])));
    }

    #[tokio::test]
    async fn test_discovery_walks_and_filters() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/team/T1/space"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "spaces": [
                    {"id": "s1", "name": "Engineering"},
                    {"id": "s2", "name": "Archived Stuff"},
                    {"id": "s3", "name": "Broken"}
                ]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/space/s1/folder"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "folders": [
                    {"id": "f1", "name": "Sprint Folder"},
                    {"id": "f2", "name": "Docs"},
                    {"id": "f3", "name": "Sprint Templates"}
                ]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/space/s3/folder"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/folder/f1/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "lists": [
                    {"id": "l1", "name": "Sprint 12"},
                    {"id": "l2", "name": "Sprint 11 (archived)"}
                ]
            })))
            .mount(&server)
            .await;

        let client = ClickUpClient::new("pk", Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.uri());
        let found = client
            .discover_sprint_lists("T1", &DiscoverySettings::default())
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "l1");
        assert_eq!(found[0].name, "Engineering - Sprint Folder - Sprint 12");
        assert_eq!(found[0].kind, ListKind::Sprint);
        assert!(found[0].discovered);
        assert_eq!(found[0].folder.as_deref(), Some("Sprint Folder"));
    }

    #[tokio::test]
    async fn test_discovery_fails_when_spaces_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/team/T1/space"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = ClickUpClient::new("pk", Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.uri());
        let result = client
            .discover_sprint_lists("T1", &DiscoverySettings::default())
            .await;
        assert!(matches!(result, Err(SourceError::Status { status: 403, .. })));
    }
}
