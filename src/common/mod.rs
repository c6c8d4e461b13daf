//! Common utilities shared by the parser, renderer and CLI

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};

use std::path::Path;

/// Read a log file, failing fast when it does not exist
pub fn read_log(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.display().to_string(),
        error: e.to_string(),
    })
}
