use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::RepositoryFailure;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub host: String,
    pub collected_at: DateTime<Utc>,
    /// Every starred project listed, including those whose details failed.
    pub starred_repositories: usize,
    pub accessible_repositories: usize,
    pub repositories: Vec<RepositoryStatus>,
    pub skipped: Vec<RepositoryFailure>,
}

/// Findings for one repository that needs attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryStatus {
    pub name: String,
    pub web_url: String,
    /// Set when `master` and `develop` point at different commits.
    pub divergence: Option<Divergence>,
    pub alignment: Option<Alignment>,
    pub other_branches: Vec<OtherBranch>,
    /// Ascending by `iid`.
    pub merge_requests: Vec<MergeRequestEntry>,
}

impl RepositoryStatus {
    pub fn state_label(&self) -> &'static str {
        match (&self.alignment, &self.divergence) {
            (Some(alignment), _) => alignment.label(),
            (None, Some(_)) => "UNSTABLE",
            (None, None) => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Divergence {
    pub master: BranchHead,
    pub develop: BranchHead,
}

/// Relationship between `master`, `develop` and the most recent tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Alignment {
    /// master == develop == latest tag.
    Clean { tag: String },
    /// master == develop, latest tag missing or behind.
    PendingRelease {
        master: BranchHead,
        develop: BranchHead,
        tag: Option<TagHead>,
    },
    /// master == latest tag, develop ahead.
    Stable { tag: String },
    /// master, develop and latest tag all differ.
    Unaligned {
        master: BranchHead,
        develop: BranchHead,
        tag: TagHead,
    },
}

impl Alignment {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clean { .. } => "CLEAN",
            Self::PendingRelease { .. } => "PENDING RELEASE",
            Self::Stable { .. } => "STABLE",
            Self::Unaligned { .. } => "UNALIGNED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchHead {
    pub name: String,
    pub version: String,
    pub last_commit: CommitSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagHead {
    pub name: String,
    pub last_commit: CommitSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub headline: String,
    pub short_id: String,
}

impl std::fmt::Display for CommitSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.headline, self.short_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherBranch {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequestEntry {
    pub iid: u64,
    pub title: String,
    pub merge_status: String,
    pub source_branch: String,
    pub target_branch: String,
    pub url: String,
    pub author: String,
    /// Date portion of the creation timestamp, `YYYY-MM-DD`.
    pub created: String,
}
