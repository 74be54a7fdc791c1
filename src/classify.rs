//! Release alignment classification.
//!
//! Pure function over aggregated repositories: no I/O, no styling. Rendering
//! lives in `output`, which maps each finding to its terminal colour.

use crate::model::{Branch, Commit, MergeRequest, Repository, Tag, DEVELOP_BRANCH, MASTER_BRANCH};
use crate::providers::gitlab::links::merge_request_url;
use crate::report::{
    Alignment, BranchHead, CommitSummary, Divergence, MergeRequestEntry, OtherBranch,
    RepositoryStatus, TagHead,
};

/// Classifies every repository, sorted by name (case-insensitive).
///
/// Repositories without findings (no `master`/`develop` pair and no open
/// merge requests) are omitted.
pub fn classify(repositories: &[Repository]) -> Vec<RepositoryStatus> {
    let mut sorted: Vec<&Repository> = repositories.iter().collect();
    sorted.sort_by_key(|repository| repository.name().to_lowercase());

    sorted.into_iter().filter_map(classify_repository).collect()
}

/// Returns `None` when nothing about the repository is worth reporting.
pub fn classify_repository(repository: &Repository) -> Option<RepositoryStatus> {
    let mut master = None;
    let mut develop = None;
    let mut other_branches = Vec::new();

    for branch in &repository.branches {
        match branch.name.as_str() {
            MASTER_BRANCH => master = Some(branch),
            DEVELOP_BRANCH => develop = Some(branch),
            _ => other_branches.push(OtherBranch {
                name: branch.name.clone(),
                version: branch.manifest.version(),
            }),
        }
    }

    let (paired, divergence, alignment) = match (master, develop) {
        (Some(master), Some(develop)) => {
            let divergence = (master.commit.id != develop.commit.id).then(|| Divergence {
                master: branch_head(master),
                develop: branch_head(develop),
            });
            let alignment = align(master, develop, repository.latest_tag());
            (true, divergence, alignment)
        }
        _ => (false, None, None),
    };

    let merge_requests = merge_request_entries(repository);

    if !paired && merge_requests.is_empty() {
        return None;
    }

    Some(RepositoryStatus {
        name: repository.name().to_string(),
        web_url: repository.project.web_url.clone(),
        divergence,
        alignment,
        other_branches,
        merge_requests,
    })
}

fn align(master: &Branch, develop: &Branch, latest_tag: Option<&Tag>) -> Option<Alignment> {
    let master_tagged = latest_tag.filter(|tag| tag.commit.id == master.commit.id);

    if master.commit.id == develop.commit.id {
        return Some(match master_tagged {
            Some(tag) => Alignment::Clean {
                tag: tag.name.clone(),
            },
            None => Alignment::PendingRelease {
                master: branch_head(master),
                develop: branch_head(develop),
                tag: latest_tag.map(tag_head),
            },
        });
    }

    match (latest_tag, master_tagged) {
        (_, Some(tag)) => Some(Alignment::Stable {
            tag: tag.name.clone(),
        }),
        (Some(tag), None) => Some(Alignment::Unaligned {
            master: branch_head(master),
            develop: branch_head(develop),
            tag: tag_head(tag),
        }),
        // Divergence already covers an untagged master/develop split
        (None, None) => None,
    }
}

fn merge_request_entries(repository: &Repository) -> Vec<MergeRequestEntry> {
    let mut merge_requests: Vec<&MergeRequest> = repository.merge_requests.iter().collect();
    merge_requests.sort_by_key(|merge_request| merge_request.iid);

    merge_requests
        .into_iter()
        .map(|merge_request| MergeRequestEntry {
            iid: merge_request.iid,
            title: merge_request.title.clone(),
            merge_status: merge_request.merge_status.clone(),
            source_branch: merge_request.source_branch.clone(),
            target_branch: merge_request.target_branch.clone(),
            url: merge_request_url(&repository.project.web_url, merge_request.iid),
            author: merge_request.author.name.clone(),
            created: merge_request.created_at.format("%Y-%m-%d").to_string(),
        })
        .collect()
}

pub fn summarize_commit(commit: &Commit) -> CommitSummary {
    CommitSummary {
        headline: commit.headline().to_string(),
        short_id: commit.short_id().to_string(),
    }
}

fn branch_head(branch: &Branch) -> BranchHead {
    BranchHead {
        name: branch.name.clone(),
        version: branch.manifest.version(),
        last_commit: summarize_commit(&branch.commit),
    }
}

fn tag_head(tag: &Tag) -> TagHead {
    TagHead {
        name: tag.name.clone(),
        last_commit: summarize_commit(&tag.commit),
    }
}
