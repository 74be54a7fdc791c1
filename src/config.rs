use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::providers::gitlab::client::DEFAULT_MAX_CONCURRENT_REQUESTS;

/// Stored configuration for gitlab-checker.
///
/// Holds the GitLab host and private token so later runs skip the prompt.
/// Lives in the platform config directory unless `--config` points elsewhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub gitlab: GitLabConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitLabConfig {
    /// GitLab host including protocol (e.g., https://gitlab.example.com)
    pub host: Option<String>,

    /// GitLab private access token
    pub token: Option<String>,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Repository file read for each branch's version
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,

    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            host: None,
            token: None,
            accept_invalid_certs: false,
            manifest_path: default_manifest_path(),
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

fn default_manifest_path() -> String {
    "package.json".to_string()
}

fn default_max_concurrent_requests() -> usize {
    DEFAULT_MAX_CONCURRENT_REQUESTS
}

/// Default location: `<config dir>/gitlab-checker/config.toml`.
pub fn default_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("No configuration directory found")?;
    Ok(dir.join("gitlab-checker").join("config.toml"))
}

impl Config {
    /// Whether both host and token are known, so no prompt is needed.
    pub fn is_complete(&self) -> bool {
        self.host().is_some() && self.token().is_some()
    }

    /// Host, unless unset or blank.
    pub fn host(&self) -> Option<&str> {
        filled(&self.gitlab.host)
    }

    /// Token, unless unset or blank.
    pub fn token(&self) -> Option<&str> {
        filled(&self.gitlab.token)
    }

    /// Load the stored configuration, or `None` when the file does not exist.
    pub fn retrieve(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from_path(path).map(Some)
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
        }
    }

    /// Save configuration to a file, creating parent directories.
    pub fn store(&self, path: &Path) -> Result<()> {
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("yaml" | "yml") => serde_yaml::to_string(self)?,
            _ => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Remove the stored configuration; a missing file is not an error.
    pub fn clear(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove config file: {}", path.display()))
            }
        }
    }
}

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
