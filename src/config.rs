use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::routing::RoutingRules;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GRAPHROUTE_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub graphroute: GraphrouteConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub routing: RoutingRules,
}

/// Process-level settings
#[derive(Debug, Clone, Deserialize)]
pub struct GraphrouteConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GraphrouteConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Locations of the tabular sources
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_nodes_path")]
    pub nodes_path: PathBuf,
    #[serde(default = "default_edges_path")]
    pub edges_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            nodes_path: default_nodes_path(),
            edges_path: default_edges_path(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_nodes_path() -> PathBuf {
    PathBuf::from("data/nodes.csv")
}

fn default_edges_path() -> PathBuf {
    PathBuf::from("data/edges.csv")
}

impl Config {
    /// Load configuration
    ///
    /// Loads environment variables from .env file (if present) first.
    /// Looks for config file in this order:
    /// 1. Path specified in GRAPHROUTE_CONFIG environment variable
    /// 2. ./config.toml in current directory (built-in defaults if absent)
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::load_from(Path::new(&path)),
            Err(_) => {
                let default_path = Path::new("config.toml");
                if default_path.exists() {
                    Self::load_from(default_path)
                } else {
                    log::debug!("No config.toml found, using built-in defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration for the CLI
    ///
    /// Loads `.env` before anything else, so variables it supplies (RUST_LOG,
    /// GRAPHROUTE_CONFIG) apply whether or not `explicit` names a config file.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let _ = dotenv::dotenv();
        match explicit {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Load and validate a specific config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.graphroute.log_level.parse::<log::LevelFilter>().is_err() {
            anyhow::bail!(
                "graphroute.log_level must be one of off, error, warn, info, debug, trace (got {})",
                self.graphroute.log_level
            );
        }

        self.routing.validate()?;
        Ok(())
    }

    pub fn nodes_path(&self) -> &Path {
        &self.data.nodes_path
    }

    pub fn edges_path(&self) -> &Path {
        &self.data.edges_path
    }
}
