//! Configuration loading
//!
//! Effective settings are resolved per value in this priority order:
//! 1. Command-line argument
//! 2. Environment variable (both handled by the binary's argument parser)
//! 3. TOML config file
//! 4. Compiled default
//!
//! The TOML file itself is located by: explicit path → `IPREP_CONFIG` →
//! `<config_dir>/iprep/config.toml`. A missing file is not fatal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::ingest::{default_tag_aliases, NormalizeRules};
use crate::{Error, Result};

/// Environment variable naming the TOML config file
pub const CONFIG_ENV_VAR: &str = "IPREP_CONFIG";

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Unlocks editing in the UI; equality check only, not a credential
pub const DEFAULT_EDIT_KEY: &str = "qwerty@321123";

/// Bootstrap configuration as read from TOML; every field optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub bind: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub edit_key: Option<String>,

    /// CSV file loaded into the store at startup
    #[serde(default)]
    pub seed_csv: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` overrides
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Ingestion normalization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Exact tag → replacement, applied to every ingested row
    #[serde(default = "default_tag_aliases")]
    pub tag_aliases: BTreeMap<String, String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            tag_aliases: default_tag_aliases(),
        }
    }
}

impl IngestConfig {
    pub fn normalize_rules(&self) -> NormalizeRules {
        NormalizeRules::with_aliases(self.tag_aliases.clone())
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl TomlConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load from `path`, or defaults when no path is given or the file is
    /// absent. An unreadable or malformed file is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            info!("No config file found, using compiled defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            warn!("Config file not found: {} (using compiled defaults)", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Locate the TOML file: explicit path → `IPREP_CONFIG` → platform config dir
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir()
        .map(|d| d.join("iprep").join("config.toml"))
        .filter(|p| p.exists())
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub edit_key: Option<String>,
    pub seed_csv: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind: String,
    pub port: u16,
    pub edit_key: String,
    pub seed_csv: Option<PathBuf>,
    pub log_level: String,
    pub normalize_rules: NormalizeRules,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::resolve(ConfigOverrides::default(), TomlConfig::default())
    }
}

impl ServiceConfig {
    /// Merge overrides over TOML over compiled defaults
    pub fn resolve(overrides: ConfigOverrides, toml: TomlConfig) -> Self {
        Self {
            bind: overrides
                .bind
                .or(toml.bind)
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port: overrides.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            edit_key: overrides
                .edit_key
                .or(toml.edit_key)
                .unwrap_or_else(|| DEFAULT_EDIT_KEY.to_string()),
            seed_csv: overrides.seed_csv.or(toml.seed_csv),
            log_level: overrides.log_level.unwrap_or(toml.logging.level),
            normalize_rules: toml.ingest.normalize_rules(),
        }
    }
}
