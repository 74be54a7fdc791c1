mod progress;
mod styling;
mod summary;
mod tables;

use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::report::StatusReport;

pub use progress::PhaseProgress;
pub use styling::{dim, magenta_bold, Palette};
pub use summary::print_summary;

/// Prints the `gitlab-checker` banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🔎 gitlab-checker"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Release health of your starred repositories")
    );
}

/// Writes the report as JSON to `output`, or stdout when no path is given.
pub fn export_json(report: &StatusReport, pretty: bool, output: Option<&Path>) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };

    if let Some(path) = output {
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        info!("Report written to: {}", path.display());
    } else {
        println!("{json}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Alignment, RepositoryStatus};
    use chrono::Utc;

    #[test]
    fn json_export_tags_alignment_state() {
        let report = StatusReport {
            host: "https://gitlab.example.com".to_string(),
            collected_at: Utc::now(),
            starred_repositories: 1,
            accessible_repositories: 1,
            repositories: vec![RepositoryStatus {
                name: "Web / shop".to_string(),
                web_url: "https://gitlab.example.com/web/shop".to_string(),
                divergence: None,
                alignment: Some(Alignment::Stable {
                    tag: "v3.0.0".to_string(),
                }),
                other_branches: Vec::new(),
                merge_requests: Vec::new(),
            }],
            skipped: Vec::new(),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        export_json(&report, true, Some(&path)).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["repositories"][0]["alignment"]["state"], "STABLE");
        assert_eq!(written["repositories"][0]["alignment"]["tag"], "v3.0.0");
        assert_eq!(written["starred_repositories"], 1);
    }
}
