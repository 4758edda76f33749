//! Configuration System
//!
//! Layered configuration for the cache and its binary: built-in defaults, then
//! an optional TOML file, then `CHANGE_CACHE__*` environment variables
//! (`__` separates nesting levels, e.g. `CHANGE_CACHE__CACHE__RECORDING=false`).

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const ENV_PREFIX: &str = "CHANGE_CACHE";

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Tracking behavior
    #[serde(default)]
    pub cache: CacheOptions,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tracking behavior of a new cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheOptions {
    /// Whether mutations are recorded from the start
    #[serde(default = "default_true")]
    pub recording: bool,

    /// Whether `flush` empties the shadow trees after a non-empty pack
    #[serde(default = "default_true")]
    pub clear_on_pack: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            recording: default_true(),
            clear_on_pack: default_true(),
        }
    }
}

impl CacheConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ApiError> {
        self.logging.validate()
    }

    /// Render as TOML, e.g. to seed a config file
    pub fn to_toml(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)))
    }
}

/// Create a Config builder with defaults applied.
fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    let logging = LoggingConfig::default();
    Config::builder()
        .set_default("cache.recording", true)?
        .set_default("cache.clear_on_pack", true)?
        .set_default("logging.level", logging.level)?
        .set_default("logging.format", logging.format)?
        .set_default("logging.output", logging.output)
}

/// Loads [`CacheConfig`] from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then `path` if it exists, then the environment
    pub fn load(path: Option<&Path>) -> Result<CacheConfig, ApiError> {
        Self::load_with(path, false)
    }

    /// Like [`ConfigLoader::load`], but the file must exist
    pub fn load_from_file(path: &Path) -> Result<CacheConfig, ApiError> {
        Self::load_with(Some(path), true)
    }

    fn load_with(path: Option<&Path>, required: bool) -> Result<CacheConfig, ApiError> {
        let mut builder = builder_with_defaults()?;
        if let Some(path) = path {
            debug!(config_path = %path.display(), required, "Adding config file source");
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            );
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: CacheConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
