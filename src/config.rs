//! Session configuration.

use crate::session::StorageKeys;
use crate::store::{FileStore, KeyValueStore, MemoryStore};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Environment variable overriding [`SessionConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "TICTACTOE_DATA_DIR";

/// Where and how a session persists its state.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding one JSON file per stored key.
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,

    /// Write state to `data_dir`; when false the session lives in memory.
    #[serde(default = "default_persist")]
    persist: bool,

    /// Key for the current game and finished-game history.
    #[serde(default = "default_game_state_key")]
    game_state_key: String,

    /// Key for the statistics counters.
    #[serde(default = "default_statistics_key")]
    statistics_key: String,
}

#[instrument]
fn default_data_dir() -> PathBuf {
    PathBuf::from(".tictactoe")
}

#[instrument]
fn default_persist() -> bool {
    true
}

#[instrument]
fn default_game_state_key() -> String {
    "gameState".to_string()
}

#[instrument]
fn default_statistics_key() -> String {
    "statistics".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            persist: default_persist(),
            game_state_key: default_game_state_key(),
            statistics_key: default_statistics_key(),
        }
    }
}

impl SessionConfig {
    /// Loads configuration from a TOML file. Missing fields take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(data_dir = %config.data_dir.display(), "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the two storage keys are usable and cannot overwrite
    /// each other, including after file-name sanitizing.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game_state_key.is_empty() || self.statistics_key.is_empty() {
            return Err(ConfigError::new("Storage keys must not be empty".to_string()));
        }
        let game_file = FileStore::file_name(&self.game_state_key);
        if game_file == FileStore::file_name(&self.statistics_key) {
            return Err(ConfigError::new(format!(
                "Storage keys {:?} and {:?} both map to {}",
                self.game_state_key, self.statistics_key, game_file
            )));
        }
        Ok(())
    }

    /// Applies the `TICTACTOE_DATA_DIR` environment variable, if set.
    #[instrument(skip(self))]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV)
            && !dir.is_empty()
        {
            debug!(%dir, "Data dir overridden from environment");
            self.data_dir = PathBuf::from(dir);
        }
        self
    }

    /// Replaces the data directory.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Turns persistence on or off.
    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Storage keys for a session.
    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::new(self.game_state_key.clone(), self.statistics_key.clone())
    }

    /// Builds the store this configuration describes.
    #[instrument(skip(self), fields(persist = self.persist))]
    pub fn open_store(&self) -> Box<dyn KeyValueStore> {
        if self.persist {
            Box::new(FileStore::new(&self.data_dir))
        } else {
            info!("Persistence disabled; using in-memory store");
            Box::new(MemoryStore::new())
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = SessionConfig::from_toml("").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.storage_keys(), StorageKeys::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = SessionConfig::from_toml(
            r#"
            data_dir = "/var/lib/tictactoe"
            statistics_key = "stats"
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir(), &PathBuf::from("/var/lib/tictactoe"));
        assert!(*config.persist());
        assert_eq!(config.game_state_key(), "gameState");
        assert_eq!(config.statistics_key(), "stats");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = SessionConfig::from_toml("persist = \"maybe\"").unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
    }

    #[test]
    fn test_colliding_keys_are_config_error() {
        let same = SessionConfig::from_toml(
            r#"
            game_state_key = "data"
            statistics_key = "data"
            "#,
        );
        assert!(same.unwrap_err().message.contains("both map to data.json"));

        let sanitized = SessionConfig::from_toml(
            r#"
            game_state_key = "game.state"
            statistics_key = "game_state"
            "#,
        );
        assert!(sanitized.unwrap_err().message.contains("game_state.json"));

        let empty = SessionConfig::from_toml("statistics_key = \"\"");
        assert!(empty.is_err());
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tictactoe.toml");
        std::fs::write(&path, "persist = false\n").unwrap();
        let config = SessionConfig::from_file(&path).unwrap();
        assert!(!*config.persist());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        assert!(SessionConfig::from_file("/nonexistent/tictactoe.toml").is_err());
    }
}
