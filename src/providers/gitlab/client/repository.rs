use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::future::join_all;
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;

use super::core::{decode, GitLabClient};
use crate::error::{CheckerError, Result};
use crate::model::{BranchRef, Manifest, MergeRequest, Project, StarredProjects, Tag};
use crate::providers::RepositoryDataSource;

#[derive(Deserialize)]
struct ProjectId {
    id: u64,
}

#[derive(Deserialize)]
struct RepositoryFile {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct PackageManifest {
    #[serde(default)]
    version: Value,
}

impl PackageManifest {
    /// Strings as written, other scalars in their JSON form.
    fn version(self) -> Option<String> {
        match self.version {
            Value::Null => None,
            Value::String(version) => Some(version),
            other => Some(other.to_string()),
        }
    }
}

impl GitLabClient {
    /// Full project record; unlike the list endpoints it always carries `permissions`.
    pub async fn project(&self, project_id: u64) -> Result<Project> {
        let url = self.endpoint(&format!("projects/{project_id}"))?;
        let page = self.fetch(url).await?;
        decode(&page.body, &format!("project {project_id}"))
    }

    async fn starred_project_ids(&self) -> Result<Vec<u64>> {
        let ids: Vec<ProjectId> = self
            .get_all(
                "projects",
                &[("starred", "true"), ("simple", "true")],
                "starred projects",
            )
            .await?;
        Ok(ids.into_iter().map(|project| project.id).collect())
    }
}

#[async_trait]
impl RepositoryDataSource for GitLabClient {
    async fn starred_projects(&self) -> Result<StarredProjects> {
        let ids = self.starred_project_ids().await?;
        info!("Found {} starred projects", ids.len());

        let results = join_all(ids.iter().map(|&id| self.project(id))).await;

        let projects = ids
            .iter()
            .zip(results)
            .filter_map(|(id, result)| match result {
                Ok(project) => Some(project),
                Err(e) => {
                    warn!("Skipping starred project {id} ({}): {e}", e.kind());
                    None
                }
            })
            .collect();

        Ok(StarredProjects {
            listed: ids.len(),
            projects,
        })
    }

    async fn merge_requests(&self, project_id: u64) -> Result<Vec<MergeRequest>> {
        self.get_all(
            &format!("projects/{project_id}/merge_requests"),
            &[("state", "opened")],
            &format!("merge requests of project {project_id}"),
        )
        .await
    }

    async fn tags(&self, project_id: u64) -> Result<Vec<Tag>> {
        self.get_all(
            &format!("projects/{project_id}/repository/tags"),
            &[],
            &format!("tags of project {project_id}"),
        )
        .await
    }

    async fn branches(&self, project_id: u64) -> Result<Vec<BranchRef>> {
        self.get_all(
            &format!("projects/{project_id}/repository/branches"),
            &[],
            &format!("branches of project {project_id}"),
        )
        .await
    }

    async fn manifest(&self, project_id: u64, commit_ref: &str) -> Result<Manifest> {
        let mut url = self.endpoint(&format!("projects/{project_id}/repository/files/"))?;
        url.path_segments_mut()
            .map_err(|()| CheckerError::Config("API URL cannot have path segments".to_string()))?
            .pop_if_empty()
            .push(&self.manifest_path);
        url.query_pairs_mut().append_pair("ref", commit_ref);

        let what = format!("{} of project {project_id} at {commit_ref}", self.manifest_path);

        match self.fetch_optional(url).await? {
            None => Ok(Manifest::missing(&self.manifest_path)),
            Some(page) => {
                let file: RepositoryFile = decode(&page.body, &what)?;
                parse_manifest(&file.content, &self.manifest_path, &what)
            }
        }
    }
}

/// Decodes the base64 `content` of a repository file into a manifest.
fn parse_manifest(content: &str, path: &str, what: &str) -> Result<Manifest> {
    let encoded: String = content.split_whitespace().collect();
    if encoded.is_empty() {
        return Ok(Manifest::missing(path));
    }

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| CheckerError::decode(what, e))?;
    let package: PackageManifest =
        serde_json::from_slice(&bytes).map_err(|e| CheckerError::decode(what, e))?;

    Ok(Manifest::Present {
        version: package.version(),
    })
}
