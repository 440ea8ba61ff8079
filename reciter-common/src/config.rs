//! Configuration loading and resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument / environment variable (highest priority)
//! 2. TOML config file
//! 3. Compiled default (fallback)
//!
//! A missing config file is not an error; the tool runs on defaults.
//! A config file that exists but does not parse is.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "RECITER_CONFIG";

/// Registry file written when nothing else is configured
pub const DEFAULT_OUTPUT: &str = "custom-reciters.json";

/// archive.org serves a reduced page to unknown agents
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration read from the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Registry file path
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// User-Agent header sent with the page request
    #[serde(default)]
    pub user_agent: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
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

fn default_log_level() -> String {
    // Progress goes to stdout; keep stderr quiet unless something is wrong
    "warn".to_string()
}

/// TOML config together with the file it came from
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    /// None when no config file was found
    pub source: Option<PathBuf>,
}

/// Default config file location: `<config_dir>/reciter-import/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("reciter-import").join("config.toml"))
}

/// Load the TOML config file.
///
/// Lookup order: `explicit` path, then `RECITER_CONFIG`, then
/// [`default_config_path`]. An explicitly named file must exist; the
/// default location may be absent.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let named = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

    if let Some(path) = named {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return read_toml_config(&path);
    }

    match default_config_path() {
        Some(path) if path.exists() => read_toml_config(&path),
        _ => Ok(LoadedConfig::default()),
    }
}

fn read_toml_config(path: &Path) -> Result<LoadedConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    let config: TomlConfig = toml::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse TOML in {}: {}", path.display(), e))
    })?;

    Ok(LoadedConfig {
        config,
        source: Some(path.to_path_buf()),
    })
}

/// Command-line configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub output: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved settings for one import run
#[derive(Debug, Clone, PartialEq)]
pub struct ImportConfig {
    pub output: PathBuf,
    pub user_agent: String,
    pub timeout: Duration,
}

impl ImportConfig {
    /// Apply CLI overrides over the TOML config over compiled defaults
    pub fn resolve(toml: &TomlConfig, overrides: ConfigOverrides) -> Result<Self> {
        let output = overrides
            .output
            .or_else(|| toml.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        let timeout_secs = overrides
            .timeout_secs
            .or(toml.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(Error::Config("timeout must be at least 1 second".to_string()));
        }

        let user_agent = toml
            .user_agent
            .clone()
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Ok(Self {
            output,
            user_agent,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
