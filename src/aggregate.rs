//! Fan-out / fan-in aggregation of per-repository data.
//!
//! Each accessible project becomes one task that joins three children:
//! merge requests, tags, and branches chained into per-branch manifests.
//! Child failures stay inside their repository: the repository is excluded
//! and the failure recorded, every other repository still completes.

use futures::future::{join_all, try_join_all};
use log::{info, warn};
use serde::Serialize;

use crate::error::{CheckerError, Result};
use crate::model::{Branch, Project, Repository};
use crate::providers::RepositoryDataSource;

/// Outcome of one aggregation run.
#[derive(Debug, Default)]
pub struct Aggregation {
    /// Projects the user can access, whether or not they aggregated.
    pub accessible: usize,
    pub repositories: Vec<Repository>,
    pub failures: Vec<RepositoryFailure>,
}

/// A repository left out of the report because one of its fetches failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryFailure {
    pub repository: String,
    pub kind: String,
    pub message: String,
}

impl RepositoryFailure {
    fn new(project: &Project, error: &CheckerError) -> Self {
        Self {
            repository: project.name_with_namespace.clone(),
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// Aggregates every accessible project; inaccessible ones are dropped up front.
pub async fn aggregate<S>(source: &S, projects: Vec<Project>) -> Aggregation
where
    S: RepositoryDataSource + ?Sized,
{
    let accessible: Vec<Project> = projects
        .into_iter()
        .filter(Project::is_accessible)
        .collect();

    info!("Aggregating {} accessible repositories", accessible.len());

    let results = join_all(
        accessible
            .into_iter()
            .map(|project| aggregate_repository(source, project)),
    )
    .await;

    let mut aggregation = Aggregation {
        accessible: results.len(),
        ..Aggregation::default()
    };
    for result in results {
        match result {
            Ok(repository) => aggregation.repositories.push(repository),
            Err(failure) => aggregation.failures.push(failure),
        }
    }

    info!(
        "Aggregated {} repositories ({} skipped)",
        aggregation.repositories.len(),
        aggregation.failures.len()
    );

    aggregation
}

async fn aggregate_repository<S>(
    source: &S,
    project: Project,
) -> std::result::Result<Repository, RepositoryFailure>
where
    S: RepositoryDataSource + ?Sized,
{
    let (merge_requests, tags, branches) = tokio::join!(
        source.merge_requests(project.id),
        source.tags(project.id),
        fetch_branches(source, project.id),
    );

    for error in [
        merge_requests.as_ref().err(),
        tags.as_ref().err(),
        branches.as_ref().err(),
    ]
    .into_iter()
    .flatten()
    {
        warn!(
            "Skipping {} ({} error): {error}",
            project.name_with_namespace,
            error.kind()
        );
    }

    match (merge_requests, tags, branches) {
        (Ok(merge_requests), Ok(mut tags), Ok(branches)) => {
            // Listed alphabetically upstream, newest first here
            tags.sort_by(|a, b| b.commit.authored_date.cmp(&a.commit.authored_date));

            Ok(Repository {
                project,
                branches,
                tags,
                merge_requests,
            })
        }
        (Err(error), _, _) | (_, Err(error), _) | (_, _, Err(error)) => {
            Err(RepositoryFailure::new(&project, &error))
        }
    }
}

/// Branches are only complete once every branch has its manifest.
async fn fetch_branches<S>(source: &S, project_id: u64) -> Result<Vec<Branch>>
where
    S: RepositoryDataSource + ?Sized,
{
    let branches = source.branches(project_id).await?;

    try_join_all(branches.into_iter().map(|branch| async move {
        let manifest = source.manifest(project_id, &branch.commit.id).await?;
        Ok::<_, CheckerError>(Branch::with_manifest(branch, manifest))
    }))
    .await
}
