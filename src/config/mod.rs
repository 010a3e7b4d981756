//! Configuration module for Amanda Search
//!
//! Settings come from a YAML file, then environment overrides. They are
//! passed explicitly to whatever needs them; there is no global instance.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Environment variable naming a settings file
pub const SETTINGS_PATH_VAR: &str = "AMANDA_SETTINGS_PATH";

/// Default locations searched for `settings.yml`, in order
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/amanda-search/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("amanda-search/settings.yml"));
    }
    paths
}

/// Settings file to use: an explicit path, then `AMANDA_SETTINGS_PATH`,
/// then the first default location that exists
pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(SETTINGS_PATH_VAR).ok().map(PathBuf::from))
        .or_else(|| default_paths().into_iter().find(|p| p.exists()))
}

/// Load settings from the located file (or defaults), then apply
/// environment overrides
pub fn load(path: Option<&Path>) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    settings.merge_env();
    Ok(settings)
}
