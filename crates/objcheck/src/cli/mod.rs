//! Command implementations.

pub mod config;
pub mod verify;

use objcheck_core::{Config, ConfigError};
use std::path::{Path, PathBuf};

/// Expand `~` in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&path_str).into_owned())
}

/// Load config from an explicit path, or from the default location.
///
/// An explicit path must load. A missing or broken file at the default
/// location warns and falls back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Ok(Config::load().unwrap_or_else(|e| {
            // Logging isn't initialized yet, so use eprintln for config warnings.
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `objcheck config path`."
            );
            Config::default()
        })),
    }
}
