//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.rentrack/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RentrackConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub data_dir: Option<String>,
    pub default_site: Option<String>,
    pub reseed_when_empty: Option<bool>,
    pub default_rental_days: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub date_format: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_SITE: &str = "Main Yard";
pub const DEFAULT_RENTAL_DAYS: u32 = 3;
/// Longest pre-filled rental period accepted from config.
pub const MAX_RENTAL_DAYS: u32 = 3650;
pub const DEFAULT_DATE_FORMAT: &str = "%b %d %H:%M";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub data_dir: PathBuf,
    pub default_site: String,
    pub reseed_when_empty: bool,
    pub default_rental_days: u32,
    pub date_format: String,
}

/// Values from the command line. `None` = flag not given.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.rentrack/`.
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".rentrack"))
}

/// Returns the path to `~/.rentrack/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    home_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.rentrack/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `RentrackConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<RentrackConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(RentrackConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<RentrackConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(RentrackConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: RentrackConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Rentrack Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# data_dir = "/home/me/.rentrack/data"   # Or set RENTRACK_DATA_DIR, or --data-dir
# default_site = "Main Yard"             # Or set RENTRACK_DEFAULT_SITE
# reseed_when_empty = true               # Load demo equipment into an empty ledger
# default_rental_days = 3                # Pre-filled expected return on the rental form

# [display]
# date_format = "%b %d %H:%M"            # chrono strftime syntax
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &RentrackConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &RentrackConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Data dir: CLI → env → config → ~/.rentrack/data → ./.rentrack-data
    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| env("RENTRACK_DATA_DIR").map(PathBuf::from))
        .or_else(|| config.general.data_dir.as_ref().map(PathBuf::from))
        .or_else(|| home_dir().map(|d| d.join("data")))
        .unwrap_or_else(|| PathBuf::from(".rentrack-data"));

    // Default site: env → config → default
    let default_site = env("RENTRACK_DEFAULT_SITE")
        .filter(|s| !s.trim().is_empty())
        .or_else(|| config.general.default_site.clone())
        .unwrap_or_else(|| DEFAULT_SITE.to_string());

    let date_format = match config.display.date_format.as_deref() {
        Some(fmt) if is_valid_date_format(fmt) => fmt.to_string(),
        Some(fmt) => {
            warn!("Ignoring invalid date_format {:?}", fmt);
            DEFAULT_DATE_FORMAT.to_string()
        }
        None => DEFAULT_DATE_FORMAT.to_string(),
    };

    ResolvedConfig {
        data_dir,
        default_site,
        reseed_when_empty: config.general.reseed_when_empty.unwrap_or(true),
        default_rental_days: config
            .general
            .default_rental_days
            .filter(|d| (1..=MAX_RENTAL_DAYS).contains(d))
            .unwrap_or(DEFAULT_RENTAL_DAYS),
        date_format,
    }
}

/// chrono panics when formatting with a malformed specifier, so reject it up front.
fn is_valid_date_format(fmt: &str) -> bool {
    use chrono::format::{Item, StrftimeItems};
    !StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error))
}
