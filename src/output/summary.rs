use std::fmt::Write;

use crate::report::{Alignment, BranchHead, CommitSummary, RepositoryStatus, StatusReport, TagHead};

use super::styling::{Palette, Tone};
use super::tables::overview_table;

const STATE_INDENT: &str = "    ";
const DETAIL_INDENT: &str = "        ";
const MERGE_REQUEST_INDENT: &str = "            ";

/// Prints the human-readable status report to stdout.
///
/// Colour coding:
/// - Green: clean repositories and repository names
/// - Yellow: stable (master tagged, develop ahead)
/// - Cyan: pending release and merge request headers
/// - Red: unaligned master/develop/tag
/// - Grey: commit ids, merge request metadata, unstable marker
/// - White italic: other open branches
pub fn print_summary(report: &StatusReport, palette: Palette, overview: bool) {
    print!("{}", render_summary(report, palette, overview));
}

pub fn render_summary(report: &StatusReport, palette: Palette, overview: bool) -> String {
    let mut output = String::new();

    if report.starred_repositories == 0 {
        let _ = writeln!(output, "No starred repos found?");
    } else if report.accessible_repositories == 0 {
        let _ = writeln!(
            output,
            "{}",
            palette.paint(
                Tone::Muted,
                format!(
                    "None of the {} starred repos are accessible.",
                    report.starred_repositories
                )
            )
        );
    }

    for line in render_lines(&report.repositories, palette) {
        let _ = writeln!(output, "{line}");
    }

    if !report.skipped.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "{}",
            palette.paint(Tone::Unaligned, format!("Skipped {} repositories:", report.skipped.len()))
        );
        for failure in &report.skipped {
            let _ = writeln!(
                output,
                "{STATE_INDENT}{} {}",
                failure.repository,
                palette.paint(Tone::Muted, format!("({} error: {})", failure.kind, failure.message))
            );
        }
    }

    if overview && !report.repositories.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "{}", overview_table(&report.repositories));
    }

    output
}

/// Report lines for every repository, in the given order.
pub fn render_lines(repositories: &[RepositoryStatus], palette: Palette) -> Vec<String> {
    repositories
        .iter()
        .flat_map(|repository| render_repository(repository, palette))
        .collect()
}

fn render_repository(repository: &RepositoryStatus, palette: Palette) -> Vec<String> {
    let mut lines = vec![String::new(), palette.paint(Tone::Clean, &repository.name)];

    if let Some(divergence) = &repository.divergence {
        lines.push(format!(
            "{} Branches master and develop are not identical, unreleased code present.",
            palette.paint(Tone::Muted, format!("{STATE_INDENT}[ UNSTABLE ]"))
        ));
        lines.push(branch_commit_line(&divergence.master, palette));
        lines.push(branch_commit_line(&divergence.develop, palette));
    }

    if let Some(alignment) = &repository.alignment {
        lines.extend(alignment_lines(alignment, palette));
    }

    if !repository.other_branches.is_empty() {
        lines.push(String::new());
        for branch in &repository.other_branches {
            lines.push(palette.paint(
                Tone::Info,
                format!("{STATE_INDENT}Open branch: {}@{}", branch.name, branch.version),
            ));
        }
    }

    if !repository.merge_requests.is_empty() {
        lines.push(String::new());
        for merge_request in &repository.merge_requests {
            lines.push(palette.paint(
                Tone::Pending,
                format!(
                    "{STATE_INDENT}Merge Request: !{} {} ({})",
                    merge_request.iid, merge_request.title, merge_request.merge_status
                ),
            ));
            lines.push(palette.paint(
                Tone::Muted,
                format!(
                    "{MERGE_REQUEST_INDENT}{} -> {}",
                    merge_request.source_branch, merge_request.target_branch
                ),
            ));
            lines.push(palette.paint(
                Tone::Muted,
                format!("{MERGE_REQUEST_INDENT}{}", merge_request.url),
            ));
            lines.push(format!(
                "{MERGE_REQUEST_INDENT}by {}, {}",
                merge_request.author, merge_request.created
            ));
        }
    }

    lines
}

fn alignment_lines(alignment: &Alignment, palette: Palette) -> Vec<String> {
    match alignment {
        Alignment::Clean { tag } => vec![format!(
            "{} Branches master/develop and latest tag at {tag}",
            palette.paint(Tone::Clean, format!("{STATE_INDENT}[ CLEAN ]"))
        )],
        Alignment::Stable { tag } => vec![format!(
            "{} Branch master and latest tag at {tag}",
            palette.paint(Tone::Stable, format!("{STATE_INDENT}[ STABLE ]"))
        )],
        Alignment::PendingRelease {
            master,
            develop,
            tag,
        } => {
            let mut lines = vec![
                format!(
                    "{} Branch master and latest tag are not at the same commit ID",
                    palette.paint(Tone::Pending, format!("{STATE_INDENT}[ PENDING RELEASE ]"))
                ),
                branch_commit_line(master, palette),
                branch_commit_line(develop, palette),
            ];
            lines.extend(tag.iter().map(|tag| tag_commit_line(tag, palette)));
            lines
        }
        Alignment::Unaligned {
            master,
            develop,
            tag,
        } => vec![
            format!(
                "{} Branches master/develop and latest tag all at different commits",
                palette.paint(Tone::Unaligned, format!("{STATE_INDENT}[ UNALIGNED ]"))
            ),
            branch_commit_line(master, palette),
            branch_commit_line(develop, palette),
            tag_commit_line(tag, palette),
        ],
    }
}

fn branch_commit_line(branch: &BranchHead, palette: Palette) -> String {
    format!(
        "{DETAIL_INDENT}Last commit on {}@{}: {}",
        branch.name,
        branch.version,
        commit_summary(&branch.last_commit, palette)
    )
}

fn tag_commit_line(tag: &TagHead, palette: Palette) -> String {
    format!(
        "{DETAIL_INDENT}Last commit on tag {}: {}",
        tag.name,
        commit_summary(&tag.last_commit, palette)
    )
}

fn commit_summary(summary: &CommitSummary, palette: Palette) -> String {
    format!(
        "{}{}",
        summary.headline,
        palette.paint(Tone::Muted, format!(" ({})", summary.short_id))
    )
}
