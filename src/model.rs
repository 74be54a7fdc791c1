//! Typed schemas for the GitLab entities the checker works with.
//!
//! The API-facing records (`Project`, `BranchRef`, `Tag`, `MergeRequest`) are
//! decoded straight from REST responses. `Branch` and `Repository` are only
//! ever built by the aggregator, once every constituent fetch has settled, so
//! the classifier never sees a partially populated record.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub const MASTER_BRANCH: &str = "master";
pub const DEVELOP_BRANCH: &str = "develop";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name_with_namespace: String,
    pub web_url: String,
    #[serde(default)]
    pub permissions: Permissions,
}

impl Project {
    /// A starred project is only reported when the user has project or group access.
    pub fn is_accessible(&self) -> bool {
        self.permissions.project_access.is_some() || self.permissions.group_access.is_some()
    }
}

/// Starred projects whose details could be fetched, out of `listed` stars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StarredProjects {
    pub listed: usize,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub project_access: Option<Access>,
    pub group_access: Option<Access>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    pub access_level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    #[serde(default)]
    pub message: String,
    pub authored_date: DateTime<FixedOffset>,
}

impl Commit {
    /// First line of the message, trimmed.
    pub fn headline(&self) -> &str {
        self.message.lines().next().unwrap_or_default().trim()
    }

    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

/// Branch as listed by the API, before its manifest is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchRef {
    pub name: String,
    pub commit: Commit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub commit: Commit,
    pub manifest: Manifest,
}

impl Branch {
    pub fn with_manifest(branch: BranchRef, manifest: Manifest) -> Self {
        Self {
            name: branch.name,
            commit: branch.commit,
            manifest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub commit: Commit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    pub iid: u64,
    pub title: String,
    #[serde(default)]
    pub merge_status: String,
    pub source_branch: String,
    pub target_branch: String,
    pub author: Author,
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
}

/// Per-branch version descriptor read from the manifest file (`package.json`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Manifest {
    Missing { path: String },
    Present { version: Option<String> },
}

impl Manifest {
    pub fn missing(path: &str) -> Self {
        Self::Missing {
            path: path.to_string(),
        }
    }

    /// Version shown next to a branch name, or a sentinel like `NO package.json`.
    pub fn version(&self) -> String {
        match self {
            Self::Missing { path } => format!("NO {path}"),
            Self::Present {
                version: Some(version),
            } => version.clone(),
            Self::Present { version: None } => "NO version".to_string(),
        }
    }
}

/// Fully aggregated repository: every branch has its manifest resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub project: Project,
    pub branches: Vec<Branch>,
    /// Newest first by authored date.
    pub tags: Vec<Tag>,
    pub merge_requests: Vec<MergeRequest>,
}

impl Repository {
    pub fn name(&self) -> &str {
        &self.project.name_with_namespace
    }

    pub fn latest_tag(&self) -> Option<&Tag> {
        self.tags.first()
    }
}
