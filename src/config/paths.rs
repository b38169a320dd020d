//! Platform-specific configuration paths and data path resolution.

use crate::config::Config;
use crate::constants::{APP_NAME, layout};
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Get the configuration directory for the current platform.
///
/// - Linux: `~/.config/segflora/`
/// - macOS: `~/Library/Application Support/segflora/`
/// - Windows: `%APPDATA%\segflora\`
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Directory holding the input tiles.
pub fn tiles_dir(config: &Config) -> PathBuf {
    config
        .paths
        .tiles_dir
        .clone()
        .unwrap_or_else(|| config.paths.data_root.join(layout::TILES_DIR))
}

/// Path of the evaluation result table.
pub fn results_csv_path(config: &Config) -> PathBuf {
    config
        .paths
        .results_csv
        .clone()
        .unwrap_or_else(|| config.paths.data_root.join(layout::RESULTS_CSV))
}
