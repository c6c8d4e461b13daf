//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Where and how charts are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Chart geometry
    #[serde(default)]
    pub chart: ChartConfig,
}

/// Image format for rendered charts
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ChartFormat {
    /// Scalable vector graphics
    #[default]
    Svg,
    /// Bitmap image
    Png,
}

impl ChartFormat {
    /// File extension used for charts in this format
    pub fn extension(self) -> &'static str {
        match self {
            ChartFormat::Svg => "svg",
            ChartFormat::Png => "png",
        }
    }
}

/// Output settings
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Directory charts are written to
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Chart image format
    #[serde(default)]
    pub format: ChartFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: ChartFormat::default(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("plots")
}

/// Chart geometry in pixels
#[derive(Debug, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    /// Gap on each side of a summary bar
    #[serde(default = "default_bar_margin")]
    pub bar_margin: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            bar_margin: default_bar_margin(),
        }
    }
}

fn default_width() -> u32 {
    1024
}
fn default_height() -> u32 {
    768
}
fn default_bar_margin() -> u32 {
    10
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default config file is
    /// read if present, otherwise defaults are returned.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(super::Error::Config(format!(
                    "config file '{}' does not exist",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        if let Some(path) = config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.output.dir, PathBuf::from("plots"));
        assert_eq!(config.output.format, ChartFormat::Svg);
        assert_eq!(config.chart.width, 1024);
        assert_eq!(config.chart.height, 768);
        assert_eq!(config.chart.bar_margin, 10);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml(
            r#"
            [output]
            format = "png"

            [chart]
            width = 640
            "#,
        )
        .unwrap();
        assert_eq!(config.output.format, ChartFormat::Png);
        assert_eq!(config.output.dir, PathBuf::from("plots"));
        assert_eq!(config.chart.width, 640);
        assert_eq!(config.chart.height, 768);
    }

    #[test]
    fn test_invalid_format_is_parse_error() {
        let err = Config::from_toml("[output]\nformat = \"gif\"\n").unwrap_err();
        assert!(matches!(err, super::super::Error::ConfigParse(_)));
    }

    #[test]
    fn test_missing_explicit_config() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&tmp.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, super::super::Error::Config(_)));
    }

    #[test]
    fn test_load_explicit_config() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[output]\ndir = \"out\"\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("out"));
    }

    #[test]
    fn test_extension() {
        assert_eq!(ChartFormat::Svg.extension(), "svg");
        assert_eq!(ChartFormat::Png.extension(), "png");
    }
}
