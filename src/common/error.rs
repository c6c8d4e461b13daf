//! Error types for parseplot
//!
//! Malformed log rows are never errors; the parser truncates or skips them.
//! Everything here is fatal for the command that hit it.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for parseplot
#[derive(Error, Debug)]
pub enum Error {
    // === Input Errors ===
    #[error("File '{path}' does not exist")]
    FileNotFound { path: String },

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Rendering Errors ===
    #[error("Test '{test}' has no '{column}' column")]
    MissingColumn { test: String, column: String },

    #[error("Test '{test}' has no samples in column '{column}'")]
    EmptySeries { test: String, column: String },

    #[error("Failed to draw chart: {0}")]
    Render(String),

    // === Value Errors ===
    #[error("Invalid quantity: '{0}'")]
    InvalidQuantity(String),

    #[error("Invalid interval: '{0}'")]
    InvalidInterval(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a missing column error
    pub fn missing_column(test: &str, column: &str) -> Self {
        Self::MissingColumn {
            test: test.to_string(),
            column: column.to_string(),
        }
    }

    /// Create an empty series error
    pub fn empty_series(test: &str, column: &str) -> Self {
        Self::EmptySeries {
            test: test.to_string(),
            column: column.to_string(),
        }
    }

    /// Wrap a plotters drawing error
    pub fn render<E: std::fmt::Display>(e: E) -> Self {
        Self::Render(e.to_string())
    }
}
