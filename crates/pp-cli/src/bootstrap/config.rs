//! # Configuration Loader
//!
//! Pure data loading: read the TOML file and map it to [`AppConfig`].
//! No validation and no defaults here; wiring decides what empty values mean.

use std::path::{Path, PathBuf};

use anyhow::Context;
use pp_core::config::AppConfig;

const APP_DIR_NAME: &str = "pixelpost";
const CONFIG_FILE_NAME: &str = "config.toml";

/// `<config dir>/pixelpost/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Load the config at `explicit`, or the default file when it exists.
///
/// An explicit path must exist. A missing default file yields an empty config.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load_config(&path),
        _ => Ok(AppConfig::empty()),
    }
}
