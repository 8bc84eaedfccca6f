//! Configuration for the SQLite MCP Server

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{GatewayError, GatewayResult};

/// Environment variable pointing at an explicit config file
pub const CONFIG_PATH_ENV: &str = "SQLITE_MCP_CONFIG";

/// SQLite MCP configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SqliteConfig {
    /// Database connection settings
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Maximum execution time for a single call in seconds
    /// Default: 30
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_path() -> PathBuf {
    PathBuf::from("crm.db")
}

fn default_timeout() -> u64 {
    30
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            timeout_secs: default_timeout(),
        }
    }
}

impl DatabaseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Startup check: the database file must already exist.
    pub fn ensure_exists(&self) -> GatewayResult<()> {
        if self.path.is_file() {
            Ok(())
        } else {
            Err(GatewayError::Unavailable(self.path.clone()))
        }
    }
}

impl SqliteConfig {
    /// Load configuration
    ///
    /// Looks for config in:
    /// 1. the explicit `path` argument (from `--config`)
    /// 2. `SQLITE_MCP_CONFIG` environment variable
    /// 3. `~/.binks/sqlite.toml`, if it exists
    ///
    /// Falls back to defaults when no file is found. An explicitly named
    /// file that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::from_file(Path::new(&path));
        }

        match dirs::home_dir().map(|home| home.join(".binks").join("sqlite.toml")) {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parse configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse config from {:?}", path))
    }

    /// Create a default config pointing to a specific database
    pub fn with_database(path: impl Into<PathBuf>) -> Self {
        Self {
            database: DatabaseConfig {
                path: path.into(),
                ..DatabaseConfig::default()
            },
        }
    }
}
