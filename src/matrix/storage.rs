//! Persisted sync position (`bot.json` in the data directory)

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const STORAGE_FILE: &str = "bot.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredState {
    #[serde(default)]
    pub sync_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BotStorage {
    path: PathBuf,
    state: StoredState,
}

impl BotStorage {
    /// Load `bot.json` from `data_dir`; a missing file yields an empty store
    pub async fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(STORAGE_FILE);
        let state = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Corrupt storage file {}", path.display()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No storage file at {}, starting fresh", path.display());
                StoredState::default()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        Ok(Self { path, state })
    }

    pub fn sync_token(&self) -> Option<&str> {
        self.state.sync_token.as_deref()
    }

    pub async fn set_sync_token(&mut self, token: &str) -> Result<()> {
        self.state.sync_token = Some(token.to_string());
        self.save().await
    }

    async fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let raw = serde_json::to_string_pretty(&self.state)?;
        tokio::fs::write(&self.path, raw)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}
