//! plotters drawing routines
//!
//! Each function draws one chart onto an already-created drawing area, so the
//! same code serves both the SVG and bitmap backends.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::common::{Error, Result};
use crate::quantity::format_si;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);
const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);
const BAR_COLOR: RGBColor = RGBColor(255, 127, 14);

/// A line chart of `(seconds, value)` points
pub struct LineChart<'a> {
    pub caption: &'a str,
    pub points: &'a [(f64, f64)],
    /// Unit of the y values, used for axis labels
    pub y_unit: &'a str,
}

/// A bar chart with one labelled bar per test
pub struct BarChart<'a> {
    pub caption: &'a str,
    pub labels: &'a [String],
    pub values: &'a [f64],
    pub y_unit: &'a str,
    pub bar_margin: u32,
}

/// Upper bound for an axis holding `values`, never zero
fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0_f64, f64::max);
    if !max.is_finite() || max <= 0.0 {
        1.0
    } else {
        max * 1.1
    }
}

pub fn draw_line_chart<DB>(root: DrawingArea<DB, Shift>, chart: &LineChart<'_>) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(Error::render)?;

    let x_max = chart
        .points
        .iter()
        .map(|(x, _)| *x)
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let y_max = axis_max(chart.points.iter().map(|(_, y)| *y));

    let mut ctx = ChartBuilder::on(&root)
        .caption(chart.caption, CAPTION_FONT)
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 90)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(Error::render)?;

    ctx.configure_mesh()
        .x_label_formatter(&|v| format_si(*v, "s"))
        .y_label_formatter(&|v| format_si(*v, chart.y_unit))
        .draw()
        .map_err(Error::render)?;

    ctx.draw_series(LineSeries::new(chart.points.iter().copied(), &LINE_COLOR))
        .map_err(Error::render)?;

    root.present().map_err(Error::render)?;
    Ok(())
}

pub fn draw_bar_chart<DB>(root: DrawingArea<DB, Shift>, chart: &BarChart<'_>) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(Error::render)?;

    // Integer ranges are inclusive for segmented coordinates
    let last_bar = chart.values.len().saturating_sub(1);
    let y_max = axis_max(chart.values.iter().copied());

    let mut ctx = ChartBuilder::on(&root)
        .caption(chart.caption, CAPTION_FONT)
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 90)
        .set_label_area_size(LabelAreaPosition::Bottom, 60)
        .build_cartesian_2d((0..last_bar).into_segmented(), 0.0..y_max)
        .map_err(Error::render)?;

    let labels = chart.labels;
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(last_bar + 1)
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .y_label_formatter(&|v| format_si(*v, chart.y_unit))
        .draw()
        .map_err(Error::render)?;

    ctx.draw_series(
        Histogram::vertical(&ctx)
            .style(BAR_COLOR.filled())
            .margin(chart.bar_margin)
            .data(chart.values.iter().copied().enumerate()),
    )
    .map_err(Error::render)?;

    root.present().map_err(Error::render)?;
    Ok(())
}
