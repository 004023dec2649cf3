//! Environment-driven configuration
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Repository coordinates and tick interval are overridable
//! - 1.0.0: Initial release with Matrix + GitHub credentials and allow-list

use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REPO_OWNER: &str = "matrix-org";
pub const DEFAULT_REPO_NAME: &str = "matrix-react-sdk";
pub const DEFAULT_BRANCH: &str = "develop";
pub const DEFAULT_FILE_PATH: &str = "src/settings/Settings.tsx";
pub const DEFAULT_TICK_MINUTES: u64 = 30;

/// Repository location of the tracked settings file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTarget {
    pub owner: String,
    pub name: String,
    pub branch: String,
    pub path: String,
}

impl Default for RepoTarget {
    fn default() -> Self {
        Self {
            owner: DEFAULT_REPO_OWNER.to_string(),
            name: DEFAULT_REPO_NAME.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            path: DEFAULT_FILE_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub homeserver_url: String,
    pub access_token: String,
    pub data_path: PathBuf,
    pub notice_room: String,
    pub github_token: String,
    pub authorized_users: Vec<String>,
    pub repo: RepoTarget,
    pub tick_interval: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let repo = RepoTarget {
            owner: optional("GITHUB_REPO_OWNER").unwrap_or_else(|| DEFAULT_REPO_OWNER.to_string()),
            name: optional("GITHUB_REPO_NAME").unwrap_or_else(|| DEFAULT_REPO_NAME.to_string()),
            branch: optional("GITHUB_BRANCH").unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            path: optional("GITHUB_FILE_PATH").unwrap_or_else(|| DEFAULT_FILE_PATH.to_string()),
        };

        let tick_minutes = match optional("TICK_INTERVAL_MINUTES") {
            Some(raw) => parse_tick_minutes(&raw)?,
            None => DEFAULT_TICK_MINUTES,
        };

        Ok(Config {
            homeserver_url: required("MATRIX_HOMESERVER_URL")?,
            access_token: required("MATRIX_ACCESS_TOKEN")?,
            data_path: PathBuf::from(optional("BOT_DATA_PATH").unwrap_or_else(|| "storage".to_string())),
            notice_room: required("NOTICE_ROOM")?,
            github_token: required("GITHUB_TOKEN")?,
            authorized_users: parse_user_list(&optional("AUTHORIZED_USERS").unwrap_or_default()),
            repo,
            tick_interval: Duration::from_secs(tick_minutes * 60),
            log_level: optional("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn required(name: &str) -> Result<String> {
    optional(name).ok_or_else(|| anyhow!("{name} environment variable not set"))
}

/// Unset and blank variables are treated the same
fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Split a comma-separated allow-list, dropping blanks
pub fn parse_user_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_tick_minutes(raw: &str) -> Result<u64> {
    let minutes: u64 = raw
        .parse()
        .with_context(|| format!("TICK_INTERVAL_MINUTES must be a whole number, got {raw:?}"))?;
    if minutes == 0 {
        return Err(anyhow!("TICK_INTERVAL_MINUTES must be greater than zero"));
    }
    Ok(minutes)
}
