use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::tables::{TableKind, lookup_kind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Kind names to sync, resolved through the table lookup
    #[serde(default = "default_tables")]
    pub tables: Vec<String>,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_tables() -> Vec<String> {
    TableKind::ALL.iter().map(|kind| kind.name().to_string()).collect()
}

fn default_log_file() -> String {
    "forge-tables.log".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tables: default_tables(),
            settings: Settings::default(),
        }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("forge-tables")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".forge-tables")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file {:?} doesn't exist, using defaults", config_path);
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::from_toml(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        debug!("Loaded config with {} tables", config.tables.len());
        Ok(config)
    }

    /// Kinds named in `tables`, in dependency order.
    ///
    /// An unknown name is an error here: a config that asks for a table the
    /// catalog does not have is a typo, not something to skip silently.
    pub fn enabled_kinds(&self) -> Result<Vec<TableKind>> {
        let mut kinds = Vec::with_capacity(self.tables.len());
        for name in &self.tables {
            let kind = lookup_kind(name).with_context(|| {
                format!(
                    "Unknown table '{}' in config, expected one of: {}",
                    name,
                    default_tables().join(", ")
                )
            })?;
            kinds.push(kind);
        }
        kinds.sort();
        kinds.dedup();
        Ok(kinds)
    }
}
