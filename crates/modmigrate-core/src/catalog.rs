use async_trait::async_trait;
use modmigrate_api::{ModrinthClient, ModrinthError};

use crate::{models::VersionRecord, Error, Result};

/// Trait for the platform lookups the engine needs - makes testing
/// easier and keeps things flexible
///
/// The engine only ever talks to this seam, so tests can drive it with
/// a mock instead of a live API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectCatalog: Send + Sync {
    /// Project ids of a collection, in curated order
    async fn collection_projects(&self, collection_id: &str) -> Result<Vec<String>>;

    /// Every published release of a project
    async fn project_versions(&self, project_id: &str) -> Result<Vec<VersionRecord>>;

    /// Human-readable title of a project, if it has one
    async fn project_title(&self, project_id: &str) -> Result<Option<String>>;
}

/// Wrapper around ModrinthClient that implements ProjectCatalog
pub struct ModrinthCatalog {
    client: ModrinthClient,
}

impl ModrinthCatalog {
    pub fn new(client: ModrinthClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProjectCatalog for ModrinthCatalog {
    async fn collection_projects(&self, collection_id: &str) -> Result<Vec<String>> {
        let collection = self
            .client
            .get_collection(collection_id)
            .await
            .map_err(|e| map_api_error(e, &format!("collection {}", collection_id)))?;

        Ok(collection.projects)
    }

    async fn project_versions(&self, project_id: &str) -> Result<Vec<VersionRecord>> {
        let versions = self
            .client
            .get_project_versions(project_id)
            .await
            .map_err(|e| map_api_error(e, &format!("project {}", project_id)))?;

        Ok(versions.into_iter().map(VersionRecord::from).collect())
    }

    async fn project_title(&self, project_id: &str) -> Result<Option<String>> {
        let project = self
            .client
            .get_project(project_id)
            .await
            .map_err(|e| map_api_error(e, &format!("project {}", project_id)))?;

        Ok(project.title)
    }
}

/// Convert API client errors to our internal error type
fn map_api_error(err: ModrinthError, what: &str) -> Error {
    match err {
        ModrinthError::NotFound(_) => Error::NotFound(what.to_string()),
        other => Error::ApiError(other.to_string()),
    }
}
