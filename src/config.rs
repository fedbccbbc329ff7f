//! Configuration management for mqli.
//!
//! Handles loading configuration from a TOML file and environment variables.
//! Command-line flags are merged on top by the binary.

use crate::error::{MqliError, Result};
use crate::render::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default Monitoring API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://monitoring.googleapis.com";

/// Default command used to mint an access token.
pub const DEFAULT_TOKEN_COMMAND: &str = "gcloud auth print-access-token";

/// Main configuration structure for mqli.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project whose metrics are queried.
    #[serde(default)]
    pub project_id: Option<String>,

    /// API base URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of result pages fetched per query.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Shell command whose stdout is the access token.
    #[serde(default = "default_token_command")]
    pub token_command: String,

    /// Static access token (not recommended to store in config).
    #[serde(default)]
    pub access_token: Option<String>,

    /// Output settings.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Cells wider than this are truncated. Unlimited when unset.
    #[serde(default)]
    pub max_column_width: Option<usize>,

    /// Show a progress mark while a query runs.
    #[serde(default = "default_spinner")]
    pub spinner: bool,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_pages() -> usize {
    100
}

fn default_token_command() -> String {
    DEFAULT_TOKEN_COMMAND.to_string()
}

fn default_spinner() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            max_column_width: None,
            spinner: default_spinner(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_id: None,
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            max_pages: default_max_pages(),
            token_command: default_token_command(),
            access_token: None,
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mqli")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| MqliError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            MqliError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Fills unset values from `MQLI_PROJECT`, `GOOGLE_CLOUD_PROJECT` and
    /// `MQLI_ACCESS_TOKEN`.
    pub fn apply_env_defaults(&mut self) {
        if self.project_id.is_none() {
            self.project_id = std::env::var("MQLI_PROJECT")
                .or_else(|_| std::env::var("GOOGLE_CLOUD_PROJECT"))
                .ok()
                .filter(|p| !p.is_empty());
        }
        if self.access_token.is_none() {
            self.access_token = std::env::var("MQLI_ACCESS_TOKEN")
                .ok()
                .filter(|t| !t.is_empty());
        }
    }

    /// Returns the configured project id.
    pub fn require_project(&self) -> Result<&str> {
        self.project_id
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                MqliError::config("No project id configured. Use --project or set MQLI_PROJECT")
            })
    }

    /// Builds the `timeSeries:query` URL for the configured project.
    pub fn query_url(&self) -> Result<Url> {
        let project = self.require_project()?;

        let mut base = Url::parse(&self.endpoint)
            .map_err(|e| MqliError::config(format!("Invalid endpoint '{}': {e}", self.endpoint)))?;
        if base.scheme() != "https" && base.scheme() != "http" {
            return Err(MqliError::config(format!(
                "Invalid endpoint scheme '{}'. Expected 'https' or 'http'",
                base.scheme()
            )));
        }
        if !is_valid_project_id(project) {
            return Err(MqliError::config(format!(
                "Invalid project id '{project}'. Expected letters, digits, '-', '.', ':' or '_'"
            )));
        }

        base.path_segments_mut()
            .map_err(|_| MqliError::config(format!("Invalid endpoint '{}'", self.endpoint)))?
            .pop_if_empty()
            .extend(["v3", "projects", project, "timeSeries:query"]);
        Ok(base)
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Project ids and numbers, including domain-scoped ids like `example.com:proj`.
fn is_valid_project_id(project: &str) -> bool {
    project
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | ':' | '_'))
        && project.chars().any(|c| c.is_ascii_alphanumeric())
}
