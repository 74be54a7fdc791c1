use anyhow::{Context, Result};
use clap::Parser;
use console::Term;
use log::info;
use std::path::{Path, PathBuf};

use crate::auth::Token;
use crate::config::{self, Config, OutputFormat};
use crate::output::{self, Palette};
use crate::prompt;
use crate::providers::gitlab::{ClientSettings, GitLabProvider};

#[derive(Parser)]
#[command(name = "gitlab-checker")]
#[command(
    author,
    version,
    about = "Release and merge request health of your starred GitLab repositories",
    long_about = None
)]
pub struct Cli {
    /// GitLab host including protocol
    #[arg(short = 'u', long = "url", env = "GITLAB_URL")]
    host: Option<String>,

    /// GitLab private access token
    #[arg(short, long, env = "GITLAB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Stored configuration file [default: <config dir>/gitlab-checker/config.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Remove the stored configuration and exit
    #[arg(long = "clear-config", visible_alias = "clearConfig")]
    clear_config: bool,

    /// Skip TLS certificate verification for this run
    #[arg(long)]
    insecure: bool,

    /// Repository file holding each branch's version
    #[arg(long)]
    manifest_path: Option<String>,

    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write JSON output to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, default_value_t = false)]
    pretty: bool,

    /// Append an overview table to the summary
    #[arg(long, default_value_t = false)]
    overview: bool,

    #[arg(long, default_value_t = false)]
    no_color: bool,

    /// Hide progress spinners
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

impl Cli {
    fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => config::default_path(),
        }
    }

    /// Flags and environment first, then the stored file, then the prompt.
    fn resolve_config(&self, path: &Path) -> Result<Config> {
        let mut config = match Config::retrieve(path)? {
            Some(stored) => {
                eprintln!("Using stored config.");
                stored
            }
            None => Config::default(),
        };

        if let Some(host) = &self.host {
            config.gitlab.host = Some(host.clone());
        }
        if let Some(token) = &self.token {
            config.gitlab.token = Some(token.clone());
        }

        if !config.is_complete() {
            let answers = prompt::ask(&Term::stderr(), config.host(), config.token())
                .context("Failed to read configuration")?;
            config.gitlab.host = Some(answers.host);
            config.gitlab.token = Some(answers.token);

            if answers.store {
                config.store(path)?;
                eprintln!("Config stored.");
            }
        }

        Ok(config)
    }

    fn client_settings(&self, config: &Config) -> Result<ClientSettings> {
        let host = config
            .gitlab
            .host
            .clone()
            .context("No GitLab host configured")?;
        let token = config.gitlab.token.clone().map(Token::from);

        let mut settings = ClientSettings::new(host, token);
        settings.accept_invalid_certs = self.insecure || config.gitlab.accept_invalid_certs;
        settings.manifest_path = self
            .manifest_path
            .clone()
            .unwrap_or_else(|| config.gitlab.manifest_path.clone());
        settings.max_concurrent_requests = config.gitlab.max_concurrent_requests;

        Ok(settings)
    }

    pub async fn execute(&self) -> Result<()> {
        let path = self.config_path()?;

        if self.clear_config {
            eprintln!("Clearing stored config.");
            Config::clear(&path)?;
            return Ok(());
        }

        let config = self.resolve_config(&path)?;
        let settings = self.client_settings(&config)?;

        info!("Checking starred repositories on {}", settings.base_url);
        eprintln!("Checking starred repositories on Gitlab..");

        let provider = GitLabProvider::new(settings)?;
        let report = provider.collect_status(!self.quiet).await?;

        match self.format.unwrap_or(config.output.format) {
            OutputFormat::Json => {
                output::export_json(
                    &report,
                    self.pretty || config.output.pretty,
                    self.output.as_deref(),
                )?;
            }
            OutputFormat::Summary => {
                let colored = !self.no_color && console::colors_enabled();
                output::print_summary(&report, Palette::new(colored), self.overview);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_config_accepts_legacy_spelling() {
        let cli = Cli::try_parse_from(["gitlab-checker", "--clearConfig"]).unwrap();
        assert!(cli.clear_config);
    }

    #[test]
    fn flags_override_stored_settings() {
        let cli = Cli::try_parse_from([
            "gitlab-checker",
            "--url",
            "https://gitlab.flag.com",
            "--token",
            "glpat-flag",
            "--insecure",
            "--manifest-path",
            "web/package.json",
        ])
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut stored = Config::default();
        stored.gitlab.host = Some("https://gitlab.stored.com".to_string());
        stored.gitlab.token = Some("glpat-stored".to_string());
        stored.store(&path).unwrap();

        let config = cli.resolve_config(&path).unwrap();
        assert_eq!(config.gitlab.host.as_deref(), Some("https://gitlab.flag.com"));

        let settings = cli.client_settings(&config).unwrap();
        assert_eq!(settings.base_url, "https://gitlab.flag.com");
        assert_eq!(settings.token.unwrap().as_str(), "glpat-flag");
        assert!(settings.accept_invalid_certs);
        assert_eq!(settings.manifest_path, "web/package.json");
    }

    #[test]
    fn stored_config_is_used_without_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut stored = Config::default();
        stored.gitlab.host = Some("https://gitlab.stored.com".to_string());
        stored.gitlab.token = Some("glpat-stored".to_string());
        stored.store(&path).unwrap();

        let cli = Cli::try_parse_from(["gitlab-checker", "--config", path.to_str().unwrap()]).unwrap();
        let config = cli.resolve_config(&path).unwrap();
        let settings = cli.client_settings(&config).unwrap();

        assert_eq!(settings.base_url, "https://gitlab.stored.com");
        assert!(!settings.accept_invalid_certs);
        assert_eq!(settings.manifest_path, "package.json");
    }

    #[tokio::test]
    async fn clear_config_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::default().store(&path).unwrap();

        let cli = Cli::try_parse_from([
            "gitlab-checker",
            "--clear-config",
            "--config",
            path.to_str().unwrap(),
        ])
        .unwrap();
        cli.execute().await.unwrap();

        assert!(!path.exists());
    }
}
