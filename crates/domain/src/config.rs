//! Application configuration structures
//!
//! Loaded by `wiss-infra::config` from environment variables or a JSON/TOML
//! file. Only `database` is required; the other sections fall back to
//! defaults.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LOG_LEVEL, DEFAULT_PAGE_SIZE};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// SQLite database settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

/// Event listing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { page_size: DEFAULT_PAGE_SIZE }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG` when set
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

fn default_pool_size() -> u32 {
    4
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
