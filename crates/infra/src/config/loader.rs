//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `SITEWIT_PARTNER_ID`: Partner id (required)
//! - `SITEWIT_PARTNER_TOKEN`: Partner token (required)
//! - `SITEWIT_URL`: Base API URL
//! - `SITEWIT_SANDBOX`: Use the sandbox API when `SITEWIT_URL` is unset
//!   (true/false)
//! - `SITEWIT_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `SITEWIT_MAX_ATTEMPTS`: Transport attempts per call
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./sitewit.{json,toml}` then `./config.{json,toml}`
//! 2. The same names in the parent and grandparent directories
//! 3. The same names next to the executable
//!
//! Files either hold the fields at top level or under a `sitewit` section.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sitewit_domain::constants::{API_BASE_URL, SANDBOX_API_BASE_URL};
use sitewit_domain::{Result, SiteWitConfig, SiteWitError};

const CONFIG_FILE_NAMES: [&str; 4] = ["sitewit.json", "sitewit.toml", "config.json", "config.toml"];

#[derive(Deserialize)]
#[serde(untagged)]
enum ConfigFile {
    Sectioned { sitewit: SiteWitConfig },
    Flat(SiteWitConfig),
}

impl From<ConfigFile> for SiteWitConfig {
    fn from(file: ConfigFile) -> Self {
        match file {
            ConfigFile::Sectioned { sitewit } => sitewit,
            ConfigFile::Flat(config) => config,
        }
    }
}

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `SiteWitError::Config` if configuration cannot be loaded from
/// either source.
pub fn load() -> Result<SiteWitConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `SiteWitError::Config` if required variables are missing or
/// numeric values cannot be parsed.
pub fn load_from_env() -> Result<SiteWitConfig> {
    let partner_id = env_var("SITEWIT_PARTNER_ID")?;
    let partner_token = env_var("SITEWIT_PARTNER_TOKEN")?;

    let url = match std::env::var("SITEWIT_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ if env_bool("SITEWIT_SANDBOX", false) => SANDBOX_API_BASE_URL.to_string(),
        _ => API_BASE_URL.to_string(),
    };

    let mut config = SiteWitConfig::with_url(url, partner_id, partner_token);

    if let Ok(raw) = std::env::var("SITEWIT_TIMEOUT_SECS") {
        config.timeout_secs = raw
            .parse::<u64>()
            .map_err(|e| SiteWitError::Config(format!("Invalid timeout: {}", e)))?;
    }

    if let Ok(raw) = std::env::var("SITEWIT_MAX_ATTEMPTS") {
        config.max_attempts = raw
            .parse::<usize>()
            .map_err(|e| SiteWitError::Config(format!("Invalid max attempts: {}", e)))?;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected by
/// file extension.
///
/// # Errors
/// Returns `SiteWitError::Config` if the file is missing, unreadable or
/// invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<SiteWitConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SiteWitError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SiteWitError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SiteWitError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<SiteWitConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let file: ConfigFile = match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SiteWitError::Config(format!("Invalid TOML format: {}", e)))?,
        "json" => serde_json::from_str(contents)
            .map_err(|e| SiteWitError::Config(format!("Invalid JSON format: {}", e)))?,
        _ => {
            return Err(SiteWitError::Config(format!("Unsupported config format: {}", extension)))
        }
    };

    Ok(file.into())
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        SiteWitError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
