//! iperf3 log parser and throughput plotter
//!
//! Reads the text output of `iperf3` (client or server), extracts each test's
//! interval and summary tables, and renders time-series and summary charts.

pub mod cli;
pub mod commands;
pub mod common;
pub mod parser;
pub mod quantity;
pub mod render;

// Re-export commonly used types for tests
pub use commands::Protocol;
pub use common::{Error, Result};
pub use parser::{parse, Role, TestRecord};
pub use quantity::Quantity;
