use chrono::Utc;
use log::{info, warn};

use crate::aggregate::aggregate;
use crate::classify::classify;
use crate::error::Result;
use crate::output::PhaseProgress;
use crate::providers::gitlab::client::{ClientSettings, GitLabClient};
use crate::providers::RepositoryDataSource;
use crate::report::StatusReport;

/// Release health of the user's starred GitLab repositories.
///
/// Lists the starred projects, aggregates branches, tags, merge requests and
/// per-branch manifests for each accessible one, then classifies the result.
pub struct GitLabProvider {
    pub client: GitLabClient,
    host: String,
}

impl GitLabProvider {
    /// Creates a provider for a GitLab instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the base URL is invalid.
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let host = settings.base_url.clone();
        let client = GitLabClient::new(settings)?;

        Ok(Self { client, host })
    }

    /// Collects the status report.
    ///
    /// Progress is displayed in three phases when `show_progress` is set:
    /// 1. Fetching starred repositories
    /// 2. Fetching branches, tags, merge requests and manifests per repository
    /// 3. Classifying release alignment
    ///
    /// # Errors
    ///
    /// Returns an error only if the starred repository listing fails.
    /// Failures for individual repositories end up in `StatusReport::skipped`.
    pub async fn collect_status(&self, show_progress: bool) -> Result<StatusReport> {
        info!("Checking starred repositories via {}", self.client.api_url());

        let progress = PhaseProgress::start_phase_1(show_progress);

        let starred = self.client.starred_projects().await?;
        let starred_repositories = starred.listed;

        if starred_repositories == 0 {
            warn!("No starred repositories found on {}", self.host);
        }

        let progress = progress.finish_phase_1_start_phase_2(starred.projects.len());

        let aggregation = aggregate(&self.client, starred.projects).await;

        if starred_repositories > 0 && aggregation.accessible == 0 {
            warn!("None of the {starred_repositories} starred repositories are accessible");
        }

        let progress = progress.finish_phase_2_start_phase_3(
            aggregation.repositories.len(),
            aggregation.failures.len(),
        );

        let repositories = classify(&aggregation.repositories);

        progress.finish_phase_3();

        Ok(StatusReport {
            host: self.host.clone(),
            collected_at: Utc::now(),
            starred_repositories,
            accessible_repositories: aggregation.accessible,
            repositories,
            skipped: aggregation.failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Alignment;
    use mockito::{Matcher, Server};

    const PROJECT: &str = r#"{"id":9,"name_with_namespace":"Web / shop",
        "web_url":"https://gitlab.example.com/web/shop",
        "permissions":{"project_access":{"access_level":40},"group_access":null}}"#;

    #[tokio::test]
    async fn collects_and_classifies_starred_repositories() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v4/projects")
            .match_query(Matcher::UrlEncoded("starred".into(), "true".into()))
            .with_status(200)
            .with_body(r#"[{"id":9}]"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v4/projects/9")
            .with_status(200)
            .with_body(PROJECT)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v4/projects/9/merge_requests")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        server
            .mock("GET", "/api/v4/projects/9/repository/tags")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"[{"name":"v1.0.0","commit":{"id":"aaaaaaaaaaaa","message":"Release 1.0.0",
                    "authored_date":"2016-01-01T00:00:00Z"}}]"#,
            )
            .create_async()
            .await;
        server
            .mock("GET", "/api/v4/projects/9/repository/branches")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"[{"name":"develop","commit":{"id":"aaaaaaaaaaaa","message":"Release 1.0.0",
                    "authored_date":"2016-01-01T00:00:00Z"}},
                   {"name":"master","commit":{"id":"aaaaaaaaaaaa","message":"Release 1.0.0",
                    "authored_date":"2016-01-01T00:00:00Z"}}]"#,
            )
            .create_async()
            .await;
        server
            .mock("GET", "/api/v4/projects/9/repository/files/package.json")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let provider = GitLabProvider::new(ClientSettings::new(server.url(), None)).unwrap();
        let report = provider.collect_status(false).await.unwrap();

        assert_eq!(report.starred_repositories, 1);
        assert_eq!(report.accessible_repositories, 1);
        assert!(report.skipped.is_empty());
        assert_eq!(report.repositories.len(), 1);
        assert_eq!(
            report.repositories[0].alignment,
            Some(Alignment::Clean {
                tag: "v1.0.0".to_string()
            })
        );
    }

    #[tokio::test]
    async fn failing_listing_is_fatal() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v4/projects")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message":"401 Unauthorized"}"#)
            .create_async()
            .await;

        let provider = GitLabProvider::new(ClientSettings::new(server.url(), None)).unwrap();
        let err = provider.collect_status(false).await.unwrap_err();

        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn no_starred_repositories_is_an_empty_report() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v4/projects")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let provider = GitLabProvider::new(ClientSettings::new(server.url(), None)).unwrap();
        let report = provider.collect_status(false).await.unwrap();

        assert_eq!(report.starred_repositories, 0);
        assert!(report.repositories.is_empty());
    }

    #[tokio::test]
    async fn failed_details_still_count_as_starred() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v4/projects")
            .match_query(Matcher::UrlEncoded("starred".into(), "true".into()))
            .with_status(200)
            .with_body(r#"[{"id":9},{"id":10}]"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v4/projects/9")
            .with_status(500)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v4/projects/10")
            .with_status(200)
            .with_body(
                r#"{"id":10,"name_with_namespace":"Web / private","web_url":"https://gitlab.example.com/web/private",
                    "permissions":{"project_access":null,"group_access":null}}"#,
            )
            .create_async()
            .await;

        let provider = GitLabProvider::new(ClientSettings::new(server.url(), None)).unwrap();
        let report = provider.collect_status(false).await.unwrap();

        assert_eq!(report.starred_repositories, 2);
        assert_eq!(report.accessible_repositories, 0);
        assert!(report.repositories.is_empty());
        assert!(report.skipped.is_empty());
    }
}
