use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MODRINTH_API_BASE: &str = "https://api.modrinth.com";

#[derive(Error, Debug)]
pub enum ModrinthError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModrinthError>;

/// Read-only client for the Modrinth REST API.
///
/// Every method is a single unauthenticated GET - no retries, no
/// pagination. Collection lookups live on the v3 API, project and
/// version lookups on v2.
pub struct ModrinthClient {
    client: reqwest::Client,
    base_url: String,
}

impl ModrinthClient {
    pub fn new() -> Self {
        Self::with_base_url(MODRINTH_API_BASE.to_string())
    }

    /// For testing with a local mock server
    pub fn with_base_url(base_url: String) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("ModMigrate/0.1.0"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, base_url }
    }

    /// List every published version of a project
    pub async fn get_project_versions(&self, project_id: &str) -> Result<Vec<ProjectVersion>> {
        let url = format!("{}/v2/project/{}/version", self.base_url, project_id);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == 404 {
            return Err(ModrinthError::NotFound(project_id.to_string()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModrinthError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let versions: Vec<ProjectVersion> = response.json().await?;
        Ok(versions)
    }

    /// Fetch a user-curated collection and its project id list
    pub async fn get_collection(&self, collection_id: &str) -> Result<Collection> {
        let url = format!("{}/v3/collection/{}", self.base_url, collection_id);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == 404 {
            return Err(ModrinthError::NotFound(collection_id.to_string()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModrinthError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let collection: Collection = response.json().await?;
        Ok(collection)
    }

    /// Fetch project metadata (title, slug, description)
    pub async fn get_project(&self, project_id: &str) -> Result<Project> {
        let url = format!("{}/v2/project/{}", self.base_url, project_id);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == 404 {
            return Err(ModrinthError::NotFound(project_id.to_string()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModrinthError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let project: Project = response.json().await?;
        Ok(project)
    }
}

impl Default for ModrinthClient {
    fn default() -> Self {
        Self::new()
    }
}

/// One published release of a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectVersion {
    pub id: String,
    pub project_id: String,
    pub name: Option<String>,
    pub version_number: String,
    /// Game versions this release supports (e.g. "1.21.8")
    #[serde(default)]
    pub game_versions: Vec<String>,
    /// Loaders this release supports (e.g. "fabric", "neoforge")
    #[serde(default)]
    pub loaders: Vec<String>,
    #[serde(default)]
    pub version_type: Option<String>,
    pub date_published: DateTime<Utc>,
    #[serde(default)]
    pub downloads: u64,
}

/// A user-curated list of projects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    /// Project ids in the collection, in curated order
    #[serde(default)]
    pub projects: Vec<String>,
}

/// Project metadata - only the fields this tool reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub downloads: u64,
}
