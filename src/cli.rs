//! Command-line argument parsing for mqli.

use crate::config::Config;
use crate::editor;
use crate::render::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// An interactive shell for Monitoring Query Language.
#[derive(Parser, Debug)]
#[command(name = "mqli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project to query
    #[arg(short = 'p', long, value_name = "PROJECT_ID")]
    pub project: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// API endpoint (e.g., https://monitoring.googleapis.com)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Run a single query and exit
    #[arg(short = 'e', long, value_name = "QUERY")]
    pub execute: Option<String>,

    /// Output format: table or json
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Truncate cells wider than this many characters
    #[arg(long, value_name = "WIDTH")]
    pub max_column_width: Option<usize>,

    /// Do not show the progress mark while a query runs
    #[arg(long)]
    pub no_spinner: bool,

    /// History file for interactive sessions
    #[arg(long, value_name = "PATH")]
    pub history: Option<PathBuf>,

    /// Write logs to a file in the state directory instead of stderr
    #[arg(long)]
    pub log_file: bool,

    /// Answer queries with a built-in sample result (no network)
    #[arg(long)]
    pub mock: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Returns the history file path, if one can be determined.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history.clone().or_else(editor::default_history_path)
    }

    /// Overrides config values with the flags that were given.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(project) = &self.project {
            config.project_id = Some(project.clone());
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(format) = self.format {
            config.display.format = format;
        }
        if self.max_column_width.is_some() {
            config.display.max_column_width = self.max_column_width;
        }
        if self.no_spinner {
            config.display.spinner = false;
        }
    }
}
