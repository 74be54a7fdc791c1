pub mod gitlab;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{BranchRef, Manifest, MergeRequest, StarredProjects, Tag};

/// Read-only view of a source-control host, as consumed by the aggregator.
#[async_trait]
pub trait RepositoryDataSource: Send + Sync {
    /// Starred projects of the authenticated user, with their permissions.
    async fn starred_projects(&self) -> Result<StarredProjects>;

    /// Open merge requests of a project.
    async fn merge_requests(&self, project_id: u64) -> Result<Vec<MergeRequest>>;

    /// Tags of a project, in whatever order the host lists them.
    async fn tags(&self, project_id: u64) -> Result<Vec<Tag>>;

    async fn branches(&self, project_id: u64) -> Result<Vec<BranchRef>>;

    /// Manifest at a commit; a missing file yields `Manifest::Missing`.
    async fn manifest(&self, project_id: u64, commit_ref: &str) -> Result<Manifest>;
}
