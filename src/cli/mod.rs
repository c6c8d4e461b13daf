//! CLI command handling
//!
//! Dispatches CLI commands and formats their console output.

use std::path::Path;

use colored::Colorize;

use crate::commands::{Commands, Protocol};
use crate::common::config::Config;
use crate::common::{read_log, Result};
use crate::parser::{self, TestRecord};
use crate::render::{self, display_title, RenderOptions, Summary};

const RULE: &str = "------------------------------------";

/// Dispatch a CLI command
pub fn dispatch(command: Commands, config_path: Option<&Path>) -> Result<()> {
    match command {
        Commands::Plot {
            file,
            protocol,
            output_dir,
            format,
            width,
            height,
        } => {
            let config = Config::load(config_path)?;
            let mut options = RenderOptions::from_config(&config);
            if let Some(dir) = output_dir {
                options.output_dir = dir;
            }
            if let Some(format) = format {
                options.format = format;
            }
            if let Some(width) = width {
                options.width = width;
            }
            if let Some(height) = height {
                options.height = height;
            }

            let records = parse_with_progress(&file)?;

            println!("{RULE}");
            println!("Done! Converting data to plots...");
            println!("{RULE}\n");

            let written = render::render_all(&records, protocol, &options)?;
            println!("Wrote {} charts to {}:", written.len(), options.output_dir.display());
            for path in &written {
                println!("  {}", path.display());
            }

            Ok(())
        }

        Commands::Parse { file, pretty } => {
            let content = read_log(&file)?;
            let records = parser::parse(&content);
            tracing::debug!(count = records.len(), "parsed test records");

            let json = if pretty {
                serde_json::to_string_pretty(&records)?
            } else {
                serde_json::to_string(&records)?
            };
            println!("{json}");

            Ok(())
        }

        Commands::Summary { file, protocol } => {
            let content = read_log(&file)?;
            let records = parser::parse(&content);

            if records.is_empty() {
                println!("No tests found in {}", file.display());
                return Ok(());
            }

            let summary = summarize(&records, protocol)?;
            let rows = summary
                .labels
                .iter()
                .zip(&summary.transfer)
                .zip(&summary.bitrate);
            for ((label, transfer), bitrate) in rows {
                print_summary_line(label, &transfer.to_string(), &bitrate.to_string());
            }

            Ok(())
        }
    }
}

/// Read and parse a log, printing progress like a long-running conversion
fn parse_with_progress(file: &Path) -> Result<Vec<TestRecord>> {
    let content = read_log(file)?;

    println!("{RULE}");
    println!("Parsing...");
    println!("{RULE}");

    let records = parser::parse(&content);
    for record in &records {
        println!(
            "{} {} {}",
            "**".green(),
            format!("Found test {}", record.title_or_undefined()).bold(),
            "**".green()
        );
    }
    tracing::debug!(count = records.len(), file = %file.display(), "parsed test records");

    Ok(records)
}

fn summarize(records: &[TestRecord], protocol: Protocol) -> Result<Summary> {
    let mut summary = Summary::new();
    for (index, record) in records.iter().enumerate() {
        let title = display_title(index, protocol, record.role);
        summary.push_record(&title, record)?;
    }
    Ok(summary)
}

fn print_summary_line(title: &str, transfer: &str, bitrate: &str) {
    println!(
        "{}  {:>14}  {:>18}",
        title.white().bold(),
        transfer.cyan(),
        bitrate.cyan()
    );
}
