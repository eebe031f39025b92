//! ClickUp REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::error::SourceError;
use crate::models::{ListDescriptor, RawTask};
use crate::TaskSource;

/// ClickUp API v2 base URL.
const CLICKUP_API_URL: &str = "https://api.clickup.com/api/v2";

/// Tasks per page returned by the list task endpoint.
const PAGE_SIZE: usize = 100;

/// Upper bound on pages fetched for one list.
const MAX_PAGES: u32 = 100;

/// ClickUp API client.
#[derive(Clone)]
pub struct ClickUpClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ClickUpClient {
    /// Create a new client with a personal API token.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: CLICKUP_API_URL.to_string(),
        })
    }

    /// Set a custom base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// GET a ClickUp endpoint and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "Calling ClickUp API");

        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, "ClickUp API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(SourceError::from)
    }

    /// Fetch the tasks of one list, including closed ones, across all pages.
    pub async fn list_tasks(&self, list_id: &str) -> Result<Vec<RawTask>, SourceError> {
        let path = format!("/list/{list_id}/task");
        let mut tasks = Vec::new();

        for page in 0..MAX_PAGES {
            let page_param = page.to_string();
            let response: TasksResponse = self
                .get_json(&path, &[("include_closed", "true"), ("page", page_param.as_str())])
                .await?;

            let count = response.tasks.len();
            tasks.extend(response.tasks.into_iter().map(ApiTask::into_raw));

            let done = match response.last_page {
                Some(last) => last || count == 0,
                None => count < PAGE_SIZE,
            };
            if done {
                return Ok(tasks);
            }
            debug!(list_id = %list_id, page, count, "Fetching next page of tasks");
        }

        warn!(list_id = %list_id, pages = MAX_PAGES, "Stopped paging tasks at page limit");
        Ok(tasks)
    }
}

#[async_trait]
impl TaskSource for ClickUpClient {
    async fn fetch(&self, list: &ListDescriptor) -> Result<Vec<RawTask>, SourceError> {
        let name = list.display_name();
        info!(list = %name, kind = %list.kind, "Fetching tasks from ClickUp");

        match self.list_tasks(&list.id).await {
            Ok(tasks) => {
                debug!(list = %name, count = tasks.len(), "Retrieved raw tasks");
                Ok(tasks)
            }
            Err(e) => {
                error!(list = %name, error = %e, "Failed to fetch tasks");
                Err(e)
            }
        }
    }
}

// =============================================================================
// ClickUp API types
// =============================================================================

#[derive(Debug, Deserialize)]
struct TasksResponse {
    #[serde(default)]
    tasks: Vec<ApiTask>,
    #[serde(default)]
    last_page: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ApiTask {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    status: Option<ApiStatus>,
    #[serde(default)]
    due_date: Option<serde_json::Value>,
    #[serde(default)]
    date_closed: Option<serde_json::Value>,
    #[serde(default)]
    assignees: Vec<ApiUser>,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    #[serde(default)]
    username: Option<String>,
}

impl ApiTask {
    fn into_raw(self) -> RawTask {
        RawTask {
            id: self.id.unwrap_or_else(|| "unknown".to_string()),
            name: self.name.unwrap_or_else(|| "Unnamed Task".to_string()),
            status: self
                .status
                .and_then(|s| s.status)
                .unwrap_or_else(|| "unknown".to_string()),
            due_at: timestamp_field(self.due_date),
            completed_at: timestamp_field(self.date_closed),
            assignees: self
                .assignees
                .into_iter()
                .filter_map(|a| a.username)
                .filter(|u| !u.is_empty())
                .collect(),
        }
    }
}

/// ClickUp usually sends timestamps as strings but numbers show up too.
fn timestamp_field(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
