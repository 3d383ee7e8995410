//! User configuration loaded from `~/.config/websh-prompt/config.toml`.
//!
//! Every key is optional. A missing file means defaults; a broken file is
//! reported and also falls back to defaults, so configuration can never
//! keep the REPL from starting.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use websh_client::DEFAULT_BASE_URL;

use crate::app::APP_NAME;
use crate::history::HistoryStore;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "WEBSH_PROMPT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scheme and host of the websh server.
    pub base_url: String,
    /// History file; defaults to a fixed file in the temp directory.
    pub history_file: Option<PathBuf>,
    /// Maximum number of history entries kept. Values below 1 are raised
    /// to 1 on load.
    pub history_limit: usize,
    /// Whether the `ping` built-in is available in the REPL.
    pub enable_ping: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            history_file: None,
            history_limit: HistoryStore::DEFAULT_LIMIT,
            enable_ping: true,
        }
    }
}

impl Config {
    /// Resolves the config file path: `$WEBSH_PROMPT_CONFIG`, else the
    /// platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
    }

    /// Loads the configuration from `path`. A missing or blank file yields
    /// the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        if self.history_limit == 0 {
            tracing::warn!("history_limit must be at least 1; using 1");
            self.history_limit = 1;
        }
        self
    }

    /// Loads the configuration from [`Config::default_path`], warning and
    /// falling back to defaults on any error.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            tracing::debug!("No config directory found, using defaults");
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// The history file this configuration points at.
    pub fn history_path(&self) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(HistoryStore::default_path)
    }
}
