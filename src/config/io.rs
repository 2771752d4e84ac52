//! Configuration file I/O operations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::Config;

impl Config {
    /// Get the global config directory path (~/.streakboard/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".streakboard")
    }

    /// Get the global config file path (~/.streakboard/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load `path` if given, else the global config, else defaults.
    ///
    /// An explicit path must exist; a missing global config is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let global_path = Self::global_config_path();
        if global_path.exists() {
            Self::from_file(&global_path)
        } else {
            tracing::debug!("No config at {}, using defaults", global_path.display());
            Ok(Self::default())
        }
    }

    /// Database file to open
    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("streakboard.db"))
    }

    /// Write the configuration as TOML, replacing `path` in one rename
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        let staged = path.with_extension("toml.tmp");
        std::fs::write(&staged, content)
            .with_context(|| format!("Failed to write {}", staged.display()))?;
        std::fs::rename(&staged, path)
            .with_context(|| format!("Failed to replace {}", path.display()))
    }
}
