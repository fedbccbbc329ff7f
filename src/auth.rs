//! Access token resolution.
//!
//! A static token wins; otherwise the configured command is run once and its
//! trimmed stdout is used as a bearer token.

use crate::config::Config;
use crate::error::{MqliError, Result};
use tokio::process::Command;
use tracing::debug;

/// Where the bearer token comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    Static(String),
    Command(String),
}

impl TokenSource {
    /// Picks the token source from configuration.
    pub fn from_config(config: &Config) -> Self {
        match config.access_token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => Self::Static(token.to_string()),
            None => Self::Command(config.token_command.clone()),
        }
    }

    /// Produces the access token.
    pub async fn fetch(&self) -> Result<String> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::Command(command) => run_token_command(command).await,
        }
    }
}

async fn run_token_command(command: &str) -> Result<String> {
    if command.trim().is_empty() {
        return Err(MqliError::auth("No access token and no token command configured"));
    }
    debug!("Fetching access token with: {}", command);

    let output = shell(command)
        .output()
        .await
        .map_err(|e| MqliError::auth(format!("Failed to run '{command}': {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MqliError::auth(format!(
            "'{command}' exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(MqliError::auth(format!("'{command}' printed no token")));
    }
    Ok(token)
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}
