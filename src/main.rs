//! parseplot - plot iperf3 throughput logs
//!
//! Parses the per-interval and summary tables printed by iperf3 and renders
//! them as charts.

use clap::Parser;
use parseplot::{cli, commands::Commands, common::logging};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "parseplot", about = "Parse and plot iperf3 text logs")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging for parseplot
    #[arg(long, short, global = true)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.verbose);

    if let Err(e) = cli::dispatch(cli.command, cli.config.as_deref()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
