//! Chart rendering
//!
//! Every test gets a transfer and a bitrate time-series chart. After the last
//! test, two bar charts compare the summary transfer and bitrate of all tests.

mod backend;
mod chart;
mod series;

pub use chart::{BarChart, LineChart};
pub use series::{display_title, Summary, TestSeries};

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::commands::Protocol;
use crate::common::config::{ChartFormat, Config};
use crate::common::paths::ensure_output_dir;
use crate::common::Result;
use crate::parser::TestRecord;
use backend::TextlessBackend;

const TRANSFER_UNIT: &str = "Bytes";
const BITRATE_UNIT: &str = "bits/sec";

/// Where and how charts are written
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub output_dir: PathBuf,
    pub format: ChartFormat,
    pub width: u32,
    pub height: u32,
    pub bar_margin: u32,
}

impl RenderOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.output.dir.clone(),
            format: config.output.format,
            width: config.chart.width,
            height: config.chart.height,
            bar_margin: config.chart.bar_margin,
        }
    }

    /// Path of a chart file named `stem`
    pub fn chart_path(&self, stem: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", stem, self.format.extension()))
    }
}

enum Chart<'a> {
    Line(LineChart<'a>),
    Bar(BarChart<'a>),
}

/// Render all charts for `records`, returning the written files in order
///
/// Stops at the first test that lacks a needed column or has no samples.
pub fn render_all(
    records: &[TestRecord],
    protocol: Protocol,
    options: &RenderOptions,
) -> Result<Vec<PathBuf>> {
    ensure_output_dir(&options.output_dir)?;

    let mut written = Vec::new();
    let mut summary = Summary::new();

    for (index, record) in records.iter().enumerate() {
        let title = display_title(index, protocol, record.role);
        let series = TestSeries::from_record(&title, record)?;

        let caption = format!("{title} - TRANSFER");
        let points = series.transfer_points();
        let path = options.chart_path(&format!("test_{:02}_transfer", index + 1));
        write_chart(
            &path,
            options,
            &Chart::Line(LineChart {
                caption: &caption,
                points: &points,
                y_unit: TRANSFER_UNIT,
            }),
        )?;
        written.push(path);

        let caption = format!("{title} - BITRATE");
        let points = series.bitrate_points();
        let path = options.chart_path(&format!("test_{:02}_bitrate", index + 1));
        write_chart(
            &path,
            options,
            &Chart::Line(LineChart {
                caption: &caption,
                points: &points,
                y_unit: BITRATE_UNIT,
            }),
        )?;
        written.push(path);

        summary.push_record(&title, record)?;
    }

    let transfer: Vec<f64> = summary.transfer.iter().map(|q| q.value).collect();
    let path = options.chart_path("summary_transfer");
    write_chart(
        &path,
        options,
        &Chart::Bar(BarChart {
            caption: "Summary of transfers",
            labels: &summary.labels,
            values: &transfer,
            y_unit: TRANSFER_UNIT,
            bar_margin: options.bar_margin,
        }),
    )?;
    written.push(path);

    let bitrate: Vec<f64> = summary.bitrate.iter().map(|q| q.value).collect();
    let path = options.chart_path("summary_bitrate");
    write_chart(
        &path,
        options,
        &Chart::Bar(BarChart {
            caption: "Summary of bitrate",
            labels: &summary.labels,
            values: &bitrate,
            y_unit: BITRATE_UNIT,
            bar_margin: options.bar_margin,
        }),
    )?;
    written.push(path);

    Ok(written)
}

fn write_chart(path: &Path, options: &RenderOptions, kind: &Chart<'_>) -> Result<()> {
    let size = (options.width, options.height);
    match options.format {
        ChartFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw(root, kind)?;
        }
        ChartFormat::Png => {
            let backend = BitMapBackend::new(path, size);
            let root = TextlessBackend::new(backend).into_drawing_area();
            draw(root, kind)?;
        }
    }
    tracing::info!(path = %path.display(), "wrote chart");
    Ok(())
}

fn draw<DB>(root: DrawingArea<DB, plotters::coord::Shift>, kind: &Chart<'_>) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    match kind {
        Chart::Line(line) => chart::draw_line_chart(root, line),
        Chart::Bar(bar) => chart::draw_bar_chart(root, bar),
    }
}
