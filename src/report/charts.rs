//! Chart rendering: bucketed counts to three PNG images via plotters.
//!
//! Three fixed canvases: a square pie chart, a wide short line chart,
//! and a wide bar chart. The pie chart shows
//! each range's share of the total with percentages to one decimal
//! place and only draws ranges that actually have members — a zero
//! slice has no arc, only a label colliding with its neighbour's. The
//! line and bar charts keep all eight ranges in range order.

use crate::bucket::{BucketedSeries, RANGE_COUNT, RANGE_LABELS};
use crate::error::Doc2ChartError;
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::Path;
use tracing::debug;

const PIE_SIZE: (u32, u32) = (600, 600);
const LINE_SIZE: (u32, u32) = (1000, 400);
const BAR_SIZE: (u32, u32) = (1000, 600);

/// Bar fill, CSS "skyblue".
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

/// One distinct colour per fixed range for the pie slices.
const SLICE_COLORS: [RGBColor; RANGE_COUNT] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
];

fn chart_failed<E: std::fmt::Display>(chart: &'static str) -> impl Fn(E) -> Doc2ChartError {
    move |e| Doc2ChartError::ChartRenderFailed {
        chart,
        detail: e.to_string(),
    }
}

/// Render pie, line, and bar charts for `series` into `dir`.
pub fn render_all(
    dir: &Path,
    column: &str,
    series: &BucketedSeries,
) -> Result<(), Doc2ChartError> {
    render_pie(&dir.join(super::PIE_CHART), column, series)?;
    render_line(&dir.join(super::LINE_CHART), column, series)?;
    render_bar(&dir.join(super::BAR_CHART), column, series)?;
    debug!("Rendered three charts for column '{column}'");
    Ok(())
}

fn render_pie(path: &Path, column: &str, series: &BucketedSeries) -> Result<(), Doc2ChartError> {
    let fail = chart_failed("pie");

    let mut sizes = Vec::new();
    let mut colors = Vec::new();
    let mut labels = Vec::new();
    for (i, (label, count)) in series.iter().enumerate() {
        if count > 0 {
            sizes.push(count as f64);
            colors.push(SLICE_COLORS[i]);
            labels.push(label.to_string());
        }
    }
    if sizes.is_empty() {
        // All counts zero: no slices to draw, leave a titled blank canvas.
        let root = BitMapBackend::new(path, PIE_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(&fail)?;
        root.titled(&format!("Pie Chart of {column}"), ("sans-serif", 24))
            .map_err(&fail)?;
        return root.present().map_err(&fail);
    }

    let root = BitMapBackend::new(path, PIE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(&fail)?;
    let root = root
        .titled(&format!("Pie Chart of {column}"), ("sans-serif", 24))
        .map_err(&fail)?;

    let center = (PIE_SIZE.0 as i32 / 2, PIE_SIZE.1 as i32 / 2);
    let radius = PIE_SIZE.0 as f64 * 0.35;
    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(140.0);
    pie.label_style(("sans-serif", 18).into_font());
    pie.percentages(("sans-serif", 16).into_font());
    root.draw(&pie).map_err(&fail)?;
    root.present().map_err(&fail)
}

fn render_line(path: &Path, column: &str, series: &BucketedSeries) -> Result<(), Doc2ChartError> {
    let fail = chart_failed("line");
    let counts = series.counts();
    let y_max = counts.iter().copied().max().unwrap_or(0).max(1) + 1;

    let root = BitMapBackend::new(path, LINE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(&fail)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Line Chart of {column}"), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0usize..RANGE_COUNT - 1, 0u64..y_max)
        .map_err(&fail)?;

    chart
        .configure_mesh()
        .x_labels(RANGE_COUNT)
        .x_label_formatter(&|i: &usize| {
            RANGE_LABELS.get(*i).copied().unwrap_or_default().to_string()
        })
        .x_desc("Ranges")
        .y_desc("Count")
        .draw()
        .map_err(&fail)?;

    chart
        .draw_series(LineSeries::new(
            counts.iter().enumerate().map(|(i, &c)| (i, c)),
            &BLUE,
        ))
        .map_err(&fail)?;
    // Circle markers at each data point.
    chart
        .draw_series(
            counts
                .iter()
                .enumerate()
                .map(|(i, &c)| Circle::new((i, c), 4, BLUE.filled())),
        )
        .map_err(&fail)?;

    root.present().map_err(&fail)
}

fn render_bar(path: &Path, column: &str, series: &BucketedSeries) -> Result<(), Doc2ChartError> {
    let fail = chart_failed("bar");
    let counts = series.counts();
    let y_max = counts.iter().copied().max().unwrap_or(0).max(1) + 1;

    let root = BitMapBackend::new(path, BAR_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(&fail)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Bar Chart of {column}"), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0usize..RANGE_COUNT).into_segmented(), 0u64..y_max)
        .map_err(&fail)?;

    chart
        .configure_mesh()
        .x_label_formatter(&|seg| match seg {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                RANGE_LABELS.get(*i).copied().unwrap_or_default().to_string()
            }
            SegmentValue::Last => String::new(),
        })
        .x_desc("Ranges")
        .y_desc("Count")
        .draw()
        .map_err(&fail)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(SKY_BLUE.filled())
                .margin(12)
                .data(counts.iter().enumerate().map(|(i, &c)| (i, c))),
        )
        .map_err(&fail)?;

    root.present().map_err(&fail)
}
