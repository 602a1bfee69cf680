//! Workbook output: the filtered dataset plus the three chart images in
//! one `.xlsx` via rust_xlsxwriter.
//!
//! Fixed layout: data from A1 with a header row, pie chart anchored at
//! H2 scaled to roughly 300×300 px,
//! line chart at H20 and bar chart at H35 at roughly 400×200 px each.
//! The anchors leave the image block clear of any realistic dataset
//! width and of each other.

use crate::bucket::ColumnAnalysis;
use crate::error::Doc2ChartError;
use rust_xlsxwriter::{Image, Workbook};
use std::path::Path;
use tracing::debug;

/// (chart file name, anchor row, anchor col, target width px, target height px)
const IMAGE_ANCHORS: [(&str, u32, u16, f64, f64); 3] = [
    (super::PIE_CHART, 1, 7, 300.0, 300.0),
    (super::LINE_CHART, 19, 7, 400.0, 200.0),
    (super::BAR_CHART, 34, 7, 400.0, 200.0),
];

/// Write `data.xlsx` into `dir`, which must already contain the three
/// chart PNGs.
pub fn write(dir: &Path, analysis: &ColumnAnalysis) -> Result<(), Doc2ChartError> {
    let path = dir.join(super::WORKBOOK);
    let failed = |detail: String| Doc2ChartError::WorkbookWriteFailed {
        path: path.clone(),
        detail,
    };

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in analysis.filtered.columns().iter().enumerate() {
        sheet
            .write_string(0, col as u16, name)
            .map_err(|e| failed(e.to_string()))?;
    }
    for (r, row) in analysis.filtered.rows().iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            // The bucketed column goes in as real numbers so spreadsheet
            // formulas see numerics, not digit strings.
            if c == analysis.column_index {
                sheet
                    .write_number(r as u32 + 1, c as u16, analysis.values[r])
                    .map_err(|e| failed(e.to_string()))?;
            } else {
                sheet
                    .write_string(r as u32 + 1, c as u16, cell)
                    .map_err(|e| failed(e.to_string()))?;
            }
        }
    }

    for (name, row, col, width, height) in IMAGE_ANCHORS {
        let image_path = dir.join(name);
        let image = Image::new(&image_path).map_err(|e| failed(e.to_string()))?;
        let image = scale_to(image, width, height);
        sheet
            .insert_image(row, col, &image)
            .map_err(|e| failed(e.to_string()))?;
    }

    workbook.save(&path).map_err(|e| failed(e.to_string()))?;
    debug!("Wrote workbook to {}", path.display());
    Ok(())
}

/// Scale an image to the target pixel box; aspect ratio is not
/// preserved.
fn scale_to(image: Image, width: f64, height: f64) -> Image {
    let (w, h) = (image.width(), image.height());
    if w <= 0.0 || h <= 0.0 {
        return image;
    }
    image
        .set_scale_width(width / w)
        .set_scale_height(height / h)
}
