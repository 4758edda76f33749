//! CLI: clap types and command execution for the `change-cache` binary.
//!
//! Commands return their rendered output as a string; the binary only prints.

use crate::cache::ChangeCache;
use crate::config::{CacheConfig, ConfigLoader};
use crate::error::ApiError;
use crate::ops::{self, Operation, Outcome};
use crate::pack::OwnedChangeSet;
use crate::types::Value;
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use std::path::{Path, PathBuf};
use tracing::info;

/// Change Cache CLI - replay tracked mutations and inspect packed change-sets
#[derive(Parser)]
#[command(name = "change-cache")]
#[command(about = "Replay mutation journals against a data tree and print packed change-sets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply a journal of operations to a data tree
    Replay {
        /// JSON file holding the initial data tree (a mapping)
        #[arg(long)]
        data: PathBuf,
        /// JSON file holding an array of operations
        #[arg(long)]
        ops: PathBuf,
        /// Output format (json or table)
        #[arg(long, default_value = "json")]
        format: String,
        /// Flush whatever is still pending after the last operation
        #[arg(long)]
        flush: bool,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the built-in defaults as TOML
    Default,
    /// Print the effective configuration as TOML
    Show,
}

/// Loaded configuration plus command dispatch
pub struct RunContext {
    config: CacheConfig,
}

impl RunContext {
    pub fn new(config_path: Option<&Path>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(None)?,
        };
        Ok(RunContext { config })
    }

    pub fn with_config(config: CacheConfig) -> Self {
        RunContext { config }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Replay {
                data,
                ops,
                format,
                flush,
            } => {
                let data: Value = serde_json::from_str(&std::fs::read_to_string(data)?)?;
                let ops: Vec<Operation> = serde_json::from_str(&std::fs::read_to_string(ops)?)?;
                let packs = self.replay(data, &ops, *flush)?;
                render_packs(&packs, format)
            }
            Commands::Config { command } => match command {
                ConfigCommands::Default => CacheConfig::default().to_toml(),
                ConfigCommands::Show => self.config.to_toml(),
            },
        }
    }

    /// Run `ops` against `data`, collecting every pack result in order
    pub fn replay(
        &self,
        data: Value,
        ops: &[Operation],
        flush: bool,
    ) -> Result<Vec<OwnedChangeSet>, ApiError> {
        let data = match data {
            Value::Object(map) => map,
            _ => {
                return Err(ApiError::ConfigError(
                    "Data file must contain a JSON object".to_string(),
                ))
            }
        };
        let mut cache = ChangeCache::with_config(data, &self.config);
        let mut packs: Vec<OwnedChangeSet> = ops::replay(&mut cache, ops)
            .into_iter()
            .filter_map(|outcome| match outcome {
                Outcome::Packed(set) => Some(set),
                _ => None,
            })
            .collect();
        if flush && cache.is_dirty() {
            packs.push(cache.flush().into_owned());
        }
        info!(operations = ops.len(), packs = packs.len(), "Replay finished");
        Ok(packs)
    }
}

/// Render pack results as a JSON array or one table row per entry
pub fn render_packs(packs: &[OwnedChangeSet], format: &str) -> Result<String, ApiError> {
    match format {
        "json" => {
            let rendered: Vec<Value> = packs.iter().map(OwnedChangeSet::to_value).collect();
            Ok(serde_json::to_string_pretty(&rendered)?)
        }
        "table" => {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(vec!["Pack", "Kind", "Path", "Value"]);
            for (index, set) in packs.iter().enumerate() {
                for path in &set.removed {
                    table.add_row(vec![
                        index.to_string(),
                        "removed".to_string(),
                        path.clone(),
                        "-".to_string(),
                    ]);
                }
                for (path, value) in &set.updated {
                    table.add_row(vec![
                        index.to_string(),
                        "updated".to_string(),
                        path.clone(),
                        value.to_string(),
                    ]);
                }
            }
            Ok(table.to_string())
        }
        _ => Err(ApiError::ConfigError(format!(
            "Invalid output format: {} (must be 'json' or 'table')",
            format
        ))),
    }
}
