//! Configuration for the query subsystem
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. an optional TOML file (default `<config dir>/feedreader/queries.toml`)
//! 3. `FEEDREADER_*` environment variables (e.g. `FEEDREADER_DATA_DIR`)

use std::path::PathBuf;

use config::{Config, Environment, File, FileFormat};
use feedreader_common::LogLevel;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings for the query engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Directory holding one saved-query file per user
    pub data_dir: PathBuf,
    /// Upper bound on saved queries per user
    pub max_saved_queries: usize,
    /// Drop deprecated queries whenever a user's list is loaded
    pub prune_deprecated_on_load: bool,
    /// Minimum log level for binaries
    pub log_level: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("feedreader")
                .join("queries"),
            max_saved_queries: 50,
            prune_deprecated_on_load: false,
            log_level: LogLevel::Info.to_string(),
        }
    }
}

impl QueryConfig {
    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_saved_queries == 0 {
            return Err(ConfigError::Validation(
                "max_saved_queries must be greater than 0".to_string(),
            ));
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "data_dir cannot be empty".to_string(),
            ));
        }
        self.log_level()?;
        Ok(())
    }

    /// Parsed log level
    pub fn log_level(&self) -> Result<LogLevel, ConfigError> {
        self.log_level
            .parse()
            .map_err(|e| ConfigError::Validation(format!("{}", e)))
    }
}

/// Loads [`QueryConfig`] from file and environment
pub struct QueryConfigLoader {
    config_path: PathBuf,
    env_prefix: String,
}

impl QueryConfigLoader {
    /// Create a loader using the default file location and `FEEDREADER` prefix
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
            env_prefix: "FEEDREADER".to_string(),
        }
    }

    /// Create with a custom config file path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Use a different environment variable prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("feedreader")
            .join("queries.toml")
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load, merge and validate the configuration. A missing file is fine.
    pub fn load(&self) -> Result<QueryConfig, ConfigError> {
        let defaults = QueryConfig::default();

        let config = Config::builder()
            .set_default("data_dir", defaults.data_dir.display().to_string())?
            .set_default("max_saved_queries", defaults.max_saved_queries as u64)?
            .set_default("prune_deprecated_on_load", defaults.prune_deprecated_on_load)?
            .set_default("log_level", defaults.log_level)?
            .add_source(
                File::from(self.config_path.clone())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix(&self.env_prefix).try_parsing(true))
            .build()?;

        let query_config: QueryConfig = config.try_deserialize()?;
        query_config.validate()?;
        Ok(query_config)
    }
}

impl Default for QueryConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
