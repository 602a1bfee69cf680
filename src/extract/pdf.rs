//! PDF table extraction: per-page text via lopdf plus line-alignment
//! table detection.
//!
//! PDFs carry no table markup, so detection is heuristic: a page's text
//! is split into lines, each line into cells on tabs or runs of two or
//! more spaces, and the longest run of consecutive lines agreeing on a
//! cell count of at least two is taken as the page's table (at most one
//! table per page, first detected row as header). Pages where no such
//! run of at least two lines exists contribute nothing and are skipped.

use crate::dataset::Dataset;
use crate::error::Doc2ChartError;
use std::path::Path;
use tracing::debug;

/// Minimum columns for a line run to count as tabular.
const MIN_COLS: usize = 2;
/// Minimum rows (header included) for a run to count as a table.
const MIN_ROWS: usize = 2;

/// Extract at most one table per page from the PDF at `path`.
pub fn extract(path: &Path) -> Result<Vec<Dataset>, Doc2ChartError> {
    let doc = lopdf::Document::load(path).map_err(|e| Doc2ChartError::CorruptDocument {
        kind: "PDF",
        detail: e.to_string(),
    })?;

    let mut tables = Vec::new();
    for &page_num in doc.get_pages().keys() {
        // A page that fails text extraction is treated the same as a
        // page with no table: skipped.
        let text = match doc.extract_text(&[page_num]) {
            Ok(text) => text,
            Err(e) => {
                debug!("Page {page_num}: text extraction failed ({e}), skipping");
                continue;
            }
        };
        if let Some(rows) = detect_table_rows(&text) {
            debug!("Page {page_num}: detected table with {} rows", rows.len());
            if let Some(dataset) = Dataset::from_raw_rows(rows) {
                tables.push(dataset);
            }
        }
    }

    if tables.is_empty() {
        return Err(Doc2ChartError::NoTablesFound { kind: "PDF" });
    }
    Ok(tables)
}

/// Find the longest run of consecutive lines that split into the same
/// number (≥ [`MIN_COLS`]) of cells. Returns the run's rows, header
/// first, or `None` when no run reaches [`MIN_ROWS`] lines.
pub(crate) fn detect_table_rows(text: &str) -> Option<Vec<Vec<String>>> {
    let lines: Vec<Vec<String>> = text
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(split_cells)
        .collect();

    let mut best: Option<(usize, usize)> = None; // (start, len)
    let mut start = 0;
    while start < lines.len() {
        let width = lines[start].len();
        if width < MIN_COLS {
            start += 1;
            continue;
        }
        let mut end = start + 1;
        while end < lines.len() && lines[end].len() == width {
            end += 1;
        }
        let len = end - start;
        if len >= MIN_ROWS && best.map_or(true, |(_, best_len)| len > best_len) {
            best = Some((start, len));
        }
        start = end;
    }

    best.map(|(start, len)| lines[start..start + len].to_vec())
}

/// Split a line into cells on tabs, or on runs of two or more spaces
/// when the line has no tabs. Single spaces stay inside a cell, so
/// multi-word headers like "unit price" survive.
fn split_cells(line: &str) -> Vec<String> {
    if line.contains('\t') {
        return line
            .split('\t')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut space_run = 0usize;
    for ch in line.chars() {
        if ch == ' ' {
            space_run += 1;
            continue;
        }
        if space_run >= 2 && !current.is_empty() {
            cells.push(std::mem::take(&mut current));
        } else if space_run == 1 && !current.is_empty() {
            current.push(' ');
        }
        space_run = 0;
        current.push(ch);
    }
    if !current.is_empty() {
        cells.push(current);
    }
    cells
}
