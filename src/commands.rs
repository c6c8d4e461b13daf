//! CLI command definitions
//!
//! Defines the clap commands for parseplot.

use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::common::config::ChartFormat;

/// Transport protocol the iperf3 run used
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    Udp,
    Tcp,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Udp => write!(f, "udp"),
            Protocol::Tcp => write!(f, "tcp"),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse an iperf3 log and draw per-test and summary charts
    Plot {
        /// Path to the iperf3 text output
        file: PathBuf,

        /// Protocol of the run, shown in chart titles
        #[arg(value_enum)]
        protocol: Protocol,

        /// Directory to write charts to (default: plots)
        #[arg(long, short)]
        output_dir: Option<PathBuf>,

        /// Chart image format (default: svg)
        #[arg(long, value_enum)]
        format: Option<ChartFormat>,

        /// Chart width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Chart height in pixels
        #[arg(long)]
        height: Option<u32>,
    },

    /// Print the parsed test records as JSON
    Parse {
        /// Path to the iperf3 text output
        file: PathBuf,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the summary transfer and bitrate of each test
    Summary {
        /// Path to the iperf3 text output
        file: PathBuf,

        /// Protocol of the run, shown in test titles
        #[arg(value_enum)]
        protocol: Protocol,
    },
}
