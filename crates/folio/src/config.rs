//! Configuration management for folio.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "folio";

/// Default local cache file name.
const CACHE_FILE_NAME: &str = "cache.json";

/// Default token file name.
const TOKEN_FILE_NAME: &str = "token";

/// Environment variable that overrides the stored token.
const TOKEN_ENV_VAR: &str = "FOLIO_TOKEN";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FOLIO_`, nested keys joined
///    with `__`, e.g. `FOLIO_REMOTE__OWNER`)
/// 2. TOML config file at `~/.config/folio/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote repository configuration.
    pub remote: RemoteConfig,
    /// Sync pacing and retry configuration.
    pub sync: SyncConfig,
    /// Local storage configuration.
    pub storage: StorageConfig,
}

/// Remote repository coordinates for the sync client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// API base URL.
    pub api_base: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Path of the portfolio JSON file within the repository.
    pub path: String,
    /// Branch to commit to.
    pub branch: String,
    /// Prefix for generated commit messages.
    pub commit_prefix: String,
}

/// Sync pacing and retry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Minimum seconds between the start of consecutive remote calls.
    pub cooldown_secs: u64,
    /// Retry ceiling for transient network/5xx failures.
    pub max_transient_retries: u32,
    /// Maximum number of rate-limit waits before giving up.
    pub max_rate_limit_waits: u32,
    /// Base delay for exponential backoff, in milliseconds.
    pub backoff_base_ms: u64,
    /// Upper bound on any single backoff or rate-limit wait, in seconds.
    pub max_wait_secs: u64,
}

/// Local storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the local cache file.
    /// Defaults to `~/.local/share/folio/cache.json`
    pub cache_path: Option<PathBuf>,
    /// Path to the token file.
    /// Defaults to `~/.local/share/folio/token`
    pub token_path: Option<PathBuf>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            owner: String::new(),
            repo: String::new(),
            path: "src/data/portfolio.json".to_string(),
            branch: "main".to_string(),
            commit_prefix: "Update portfolio data".to_string(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 3,
            max_transient_retries: 3,
            max_rate_limit_waits: 2,
            backoff_base_ms: 500,
            max_wait_secs: 120,
        }
    }
}

impl RemoteConfig {
    /// Check whether the remote coordinates are fully specified.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.owner.is_empty() && !self.repo.is_empty()
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("FOLIO_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        // Partial remote coordinates are a misconfiguration; all-empty
        // (sync disabled) and fully-specified are both fine.
        if self.remote.owner.is_empty() != self.remote.repo.is_empty() {
            return Err(Error::ConfigValidation {
                message: "remote.owner and remote.repo must be set together".to_string(),
            });
        }

        if self.remote.branch.is_empty() {
            return Err(Error::ConfigValidation {
                message: "remote.branch must not be empty".to_string(),
            });
        }

        if self.remote.path.is_empty() {
            return Err(Error::ConfigValidation {
                message: "remote.path must not be empty".to_string(),
            });
        }

        if self.sync.backoff_base_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "sync.backoff_base_ms must be greater than 0".to_string(),
            });
        }

        if self.sync.max_wait_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "sync.max_wait_secs must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the cache file path, resolving defaults if not set.
    #[must_use]
    pub fn cache_path(&self) -> PathBuf {
        self.storage
            .cache_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(CACHE_FILE_NAME))
    }

    /// Get the token file path, resolving defaults if not set.
    #[must_use]
    pub fn token_path(&self) -> PathBuf {
        self.storage
            .token_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(TOKEN_FILE_NAME))
    }

    /// Resolve the remote token, if any.
    ///
    /// The `FOLIO_TOKEN` environment variable takes precedence over the
    /// token file. An absent token disables the sync client.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            if !token.trim().is_empty() {
                return Some(token.trim().to_string());
            }
        }
        match std::fs::read_to_string(self.token_path()) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(_) => None,
        }
    }

    /// Get the inter-call cooldown as a Duration.
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.sync.cooldown_secs)
    }

    /// Get the backoff base as a Duration.
    #[must_use]
    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.sync.backoff_base_ms)
    }

    /// Get the wait cap as a Duration.
    #[must_use]
    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.sync.max_wait_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.remote.api_base, "https://api.github.com");
        assert_eq!(config.remote.branch, "main");
        assert!(!config.remote.is_configured());
        assert_eq!(config.sync.cooldown_secs, 3);
        assert_eq!(config.sync.max_transient_retries, 3);
    }

    #[test]
    fn test_remote_is_configured() {
        let mut remote = RemoteConfig::default();
        assert!(!remote.is_configured());

        remote.owner = "someone".to_string();
        remote.repo = "site".to_string();
        assert!(remote.is_configured());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_partial_remote() {
        let mut config = Config::default();
        config.remote.owner = "someone".to_string();

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("must be set together"));
    }

    #[test]
    fn test_validate_empty_branch() {
        let mut config = Config::default();
        config.remote.branch = String::new();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("remote.branch"));
    }

    #[test]
    fn test_validate_empty_path() {
        let mut config = Config::default();
        config.remote.path = String::new();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("remote.path"));
    }

    #[test]
    fn test_validate_zero_backoff_base() {
        let mut config = Config::default();
        config.sync.backoff_base_ms = 0;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("sync.backoff_base_ms"));
    }

    #[test]
    fn test_validate_zero_max_wait() {
        let mut config = Config::default();
        config.sync.max_wait_secs = 0;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("sync.max_wait_secs"));
    }

    #[test]
    fn test_cache_path_default() {
        let config = Config::default();
        assert!(config
            .cache_path()
            .to_string_lossy()
            .contains("cache.json"));
    }

    #[test]
    fn test_cache_path_custom() {
        let mut config = Config::default();
        config.storage.cache_path = Some(PathBuf::from("/custom/cache.json"));
        assert_eq!(config.cache_path(), PathBuf::from("/custom/cache.json"));
    }

    #[test]
    fn test_token_path_default() {
        let config = Config::default();
        assert!(config.token_path().to_string_lossy().contains("token"));
    }

    #[test]
    fn test_token_missing_file() {
        let mut config = Config::default();
        config.storage.token_path = Some(PathBuf::from("/nonexistent/folio-token"));
        // Not asserting on the env var here; the file path is bogus.
        if std::env::var(TOKEN_ENV_VAR).is_err() {
            assert!(config.token().is_none());
        }
    }

    #[test]
    fn test_token_from_file_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let token_file = dir.path().join("token");
        std::fs::write(&token_file, "ghp_abc123\n").unwrap();

        let mut config = Config::default();
        config.storage.token_path = Some(token_file);
        if std::env::var(TOKEN_ENV_VAR).is_err() {
            assert_eq!(config.token(), Some("ghp_abc123".to_string()));
        }
    }

    #[test]
    fn test_duration_accessors() {
        let config = Config::default();
        assert_eq!(config.cooldown(), Duration::from_secs(3));
        assert_eq!(config.backoff_base(), Duration::from_millis(500));
        assert_eq!(config.max_wait(), Duration::from_secs(120));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("folio"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults),
        // unless FOLIO_ environment overrides are present.
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
    }

    #[test]
    fn test_remote_config_serialize() {
        let remote = RemoteConfig::default();
        let json = serde_json::to_string(&remote).unwrap();
        assert!(json.contains("api_base"));
        assert!(json.contains("commit_prefix"));
    }

    #[test]
    fn test_sync_config_deserialize() {
        let json = r#"{"cooldown_secs": 10, "max_transient_retries": 1}"#;
        let sync: SyncConfig = serde_json::from_str(json).unwrap();
        assert_eq!(sync.cooldown_secs, 10);
        assert_eq!(sync.max_transient_retries, 1);
        // Unspecified fields keep their defaults
        assert_eq!(sync.backoff_base_ms, 500);
    }

    #[test]
    fn test_storage_config_serialize() {
        let storage = StorageConfig::default();
        let json = serde_json::to_string(&storage).unwrap();
        assert!(json.contains("cache_path"));
    }
}
