//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL, the session storage backend, and the
//! last used login name.
//!
//! Configuration is stored at `~/.config/tickerfolio/config.json`. The
//! `TICKERFOLIO_API_URL` environment variable overrides `api_url`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::auth::{FileStorage, KeyringStorage, SessionStorage};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "tickerfolio";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Environment variable holding the API base URL
pub const API_URL_ENV: &str = "TICKERFOLIO_API_URL";

/// Where the token/user-id pair is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    File,
    Keyring,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    #[serde(default)]
    pub storage: StorageBackend,
    pub last_username: Option<String>,
    /// Unset means the transport default (no client-side timeout)
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn session_path(&self) -> Result<PathBuf> {
        Ok(self.cache_dir()?.join(SESSION_FILE))
    }

    /// Resolve the API base URL: environment first, then the config file.
    pub fn api_base_url(&self) -> Result<String> {
        let from_env = std::env::var(API_URL_ENV).ok();
        Self::pick_base_url(from_env, self.api_url.clone())
    }

    fn pick_base_url(from_env: Option<String>, from_file: Option<String>) -> Result<String> {
        from_env
            .filter(|u| !u.trim().is_empty())
            .or(from_file.filter(|u| !u.trim().is_empty()))
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No API URL configured. Set {} or `api_url` in the config file",
                    API_URL_ENV
                )
            })
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Open the configured session storage backend.
    pub fn open_storage(&self) -> Result<Box<dyn SessionStorage>> {
        Ok(match self.storage {
            StorageBackend::File => Box::new(FileStorage::new(self.session_path()?)),
            StorageBackend::Keyring => Box::new(KeyringStorage::new()),
        })
    }
}
