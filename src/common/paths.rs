//! Configuration paths
//!
//! Uses the directories crate for platform-appropriate locations.

use std::io;
use std::path::PathBuf;

/// Name used for the configuration directory
const APP_NAME: &str = "iperf-parseplot";

/// Get the configuration directory path
///
/// - Linux: `~/.config/iperf-parseplot/`
/// - macOS: `~/Library/Application Support/iperf-parseplot/`
/// - Windows: `%APPDATA%\iperf-parseplot\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Ensure a chart output directory exists
pub fn ensure_output_dir(dir: &std::path::Path) -> io::Result<PathBuf> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(dir.to_path_buf())
}
