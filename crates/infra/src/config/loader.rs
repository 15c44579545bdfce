//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If a required variable is unset, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `WISS_DB_PATH`: Database file path (required)
//! - `WISS_DB_POOL_SIZE`: Connection pool size (required)
//! - `WISS_PAGE_SIZE`: Events per listing page
//! - `WISS_LOG_LEVEL`: Default tracing filter directive
//! - `WISS_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes `config.{json,toml}` then `wiss.{json,toml}` in the
//! current directory, its two parents, and the executable's directory.

use std::path::{Path, PathBuf};

use wiss_domain::{Config, DatabaseConfig, ListingConfig, LoggingConfig, Result, WissError};

const FILE_STEMS: [&str; 2] = ["config", "wiss"];
const EXTENSIONS: [&str; 2] = ["json", "toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `WissError::Config` if configuration cannot be loaded from either
/// source or the file is malformed.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "environment incomplete, trying config file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `WISS_DB_PATH` and `WISS_DB_POOL_SIZE` are required; unset optional
/// variables take the same defaults as a config file.
///
/// # Errors
/// Returns `WissError::Config` if a required variable is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let path = env_var("WISS_DB_PATH")?;
    let pool_size = env_parse("WISS_DB_POOL_SIZE", "pool size")?.ok_or_else(|| {
        WissError::Config("Missing required environment variable: WISS_DB_POOL_SIZE".to_string())
    })?;
    let page_size =
        env_parse("WISS_PAGE_SIZE", "page size")?.unwrap_or_else(|| ListingConfig::default().page_size);
    if page_size == 0 {
        return Err(WissError::Config("WISS_PAGE_SIZE must be at least 1".to_string()));
    }

    let logging_defaults = LoggingConfig::default();
    let level = std::env::var("WISS_LOG_LEVEL").unwrap_or(logging_defaults.level);
    let json = env_bool("WISS_LOG_JSON", logging_defaults.json);

    Ok(Config {
        database: DatabaseConfig { path, pool_size },
        listing: ListingConfig { page_size },
        logging: LoggingConfig { level, json },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. The format is picked
/// from the file extension.
///
/// # Errors
/// Returns `WissError::Config` if the file is missing, unreadable or invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(WissError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            WissError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| WissError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let config: Config = match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| WissError::Config(format!("Invalid TOML format: {e}")))?,
        "json" => serde_json::from_str(contents)
            .map_err(|e| WissError::Config(format!("Invalid JSON format: {e}")))?,
        _ => return Err(WissError::Config(format!("Unsupported config format: {extension}"))),
    };

    if config.listing.page_size == 0 {
        return Err(WissError::Config("listing.page_size must be at least 1".to_string()));
    }
    Ok(config)
}

/// Probe the standard locations and return the first config file found.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| {
            FILE_STEMS.iter().flat_map(move |stem| {
                EXTENSIONS.iter().map(move |ext| dir.join(format!("{stem}.{ext}")))
            })
        })
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| WissError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse an optional numeric variable; unset is `None`, garbage is an error.
fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| WissError::Config(format!("Invalid {what}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const VARS: [&str; 5] =
        ["WISS_DB_PATH", "WISS_DB_POOL_SIZE", "WISS_PAGE_SIZE", "WISS_LOG_LEVEL", "WISS_LOG_JSON"];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        for (value, expected) in [("1", true), ("TRUE", true), ("on", true), ("no", false), ("0", false)] {
            std::env::set_var("WISS_TEST_BOOL", value);
            assert_eq!(env_bool("WISS_TEST_BOOL", !expected), expected, "value {value}");
        }

        std::env::remove_var("WISS_TEST_BOOL");
        assert!(env_bool("WISS_TEST_BOOL", true));
        assert!(!env_bool("WISS_TEST_BOOL", false));
    }

    #[test]
    fn load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("WISS_DB_PATH", "/tmp/wiss.db");
        std::env::set_var("WISS_DB_POOL_SIZE", "8");
        std::env::set_var("WISS_PAGE_SIZE", "25");
        std::env::set_var("WISS_LOG_LEVEL", "wiss_core=debug");
        std::env::set_var("WISS_LOG_JSON", "true");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.database.path, "/tmp/wiss.db");
        assert_eq!(config.database.pool_size, 8);
        assert_eq!(config.listing.page_size, 25);
        assert_eq!(config.logging.level, "wiss_core=debug");
        assert!(config.logging.json);

        clear_env();
    }

    #[test]
    fn load_from_env_defaults_optional_vars() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("WISS_DB_PATH", "/tmp/wiss.db");
        std::env::set_var("WISS_DB_POOL_SIZE", "4");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.database.pool_size, 4);
        assert_eq!(config.listing, ListingConfig::default());
        assert_eq!(config.logging, LoggingConfig::default());

        clear_env();
    }

    #[test]
    fn load_from_env_missing_required_vars() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        assert!(matches!(load_from_env(), Err(WissError::Config(_))));

        std::env::set_var("WISS_DB_PATH", "/tmp/wiss.db");
        let err = load_from_env().unwrap_err();
        assert!(matches!(err, WissError::Config(ref msg) if msg.contains("WISS_DB_POOL_SIZE")));

        clear_env();
    }

    #[test]
    fn load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("WISS_DB_PATH", "/tmp/wiss.db");
        std::env::set_var("WISS_DB_POOL_SIZE", "lots");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, WissError::Config(ref msg) if msg.contains("pool size")));

        clear_env();
    }

    #[test]
    fn parse_config_json_and_toml() {
        let json = r#"{ "database": { "path": "a.db" }, "listing": { "page_size": 5 } }"#;
        let config = parse_config(json, Path::new("wiss.json")).unwrap();
        assert_eq!(config.database.path, "a.db");
        assert_eq!(config.listing.page_size, 5);

        let toml = "[database]\npath = \"b.db\"\npool_size = 2\n\n[logging]\njson = true\n";
        let config = parse_config(toml, Path::new("wiss.toml")).unwrap();
        assert_eq!(config.database.pool_size, 2);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_config_rejects_zero_page_size() {
        let json = r#"{ "database": { "path": "a.db" }, "listing": { "page_size": 0 } }"#;
        assert!(matches!(
            parse_config(json, Path::new("wiss.json")),
            Err(WissError::Config(_))
        ));
    }

    #[test]
    fn parse_config_unsupported_format() {
        assert!(parse_config("path: a.db", Path::new("wiss.yaml")).is_err());
    }

    #[test]
    fn load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/wiss.json")));
        assert!(matches!(result, Err(WissError::Config(_))));
    }
}
