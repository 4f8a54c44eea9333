//! Bootstrap configuration and database path resolution
//!
//! The TOML file carries bootstrap concerns only: where the database lives,
//! what to bind, how to log. A missing file is not fatal; callers get
//! built-in defaults.
//!
//! Database path priority:
//! 1. Command-line argument (`--database`)
//! 2. Environment variable (`GIGDIR_DATABASE`)
//! 3. TOML `database_path`
//! 4. `<data_local_dir>/gigdir/gigdir.db`

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Environment variable overriding the database location
pub const GIGDIR_DATABASE_ENV: &str = "GIGDIR_DATABASE";

const APP_DIR: &str = "gigdir";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TomlConfig {
    /// SQLite database file (optional; see module docs for fallbacks)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            host: default_host(),
            port: default_port(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` wins when set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML document
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Failed to parse TOML: {e}")))
    }

    /// Read and parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file {path:?}: {e}")))?;
        Self::from_toml_str(&raw)
    }
}

/// `<config_dir>/gigdir/config.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// The file [`load_toml_config`] reads: the explicit path if given, else
/// the default location when something exists there
pub fn locate_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|path| path.exists()),
    }
}

/// Load the bootstrap config
///
/// An explicitly given file must exist and parse. Without one, the default
/// location is tried; if nothing is there the built-in defaults are used.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    match locate_config_file(explicit) {
        Some(path) => TomlConfig::from_file(&path),
        None => Ok(TomlConfig::default()),
    }
}

/// OS-dependent default database location
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("./gigdir_data"))
        .join("gigdir.db")
}

/// Resolve the database path: CLI, then environment, then TOML, then default
pub fn resolve_database_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &TomlConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.database_path {
        return path.clone();
    }

    default_database_path()
}
