//! Word (`.docx`) table extraction via docx-rs.
//!
//! Every table in the document body becomes one [`Dataset`], first row
//! as header. Unlike PDF there is no detection heuristic — the format
//! marks its tables explicitly.

use crate::dataset::Dataset;
use crate::error::Doc2ChartError;
use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};
use std::path::Path;
use tracing::debug;

/// Extract every table from the Word document at `path`.
pub fn extract(path: &Path) -> Result<Vec<Dataset>, Doc2ChartError> {
    let bytes = std::fs::read(path).map_err(|e| Doc2ChartError::CorruptDocument {
        kind: "Word",
        detail: e.to_string(),
    })?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| Doc2ChartError::CorruptDocument {
        kind: "Word",
        detail: e.to_string(),
    })?;

    let mut tables = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Table(table) = child {
            if let Some(dataset) = Dataset::from_raw_rows(table_rows(table)) {
                debug!("Extracted Word table with {} rows", dataset.len() + 1);
                tables.push(dataset);
            }
        }
    }

    if tables.is_empty() {
        return Err(Doc2ChartError::NoTablesFound { kind: "Word" });
    }
    Ok(tables)
}

/// Flatten a docx table into trimmed cell strings, one `Vec` per row.
fn table_rows(table: &Table) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for row in &table.rows {
        let TableChild::TableRow(row) = row;
        let mut cells = Vec::with_capacity(row.cells.len());
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell;
            let mut text = String::new();
            for content in &cell.children {
                if let TableCellContent::Paragraph(p) = content {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(&paragraph_text(p));
                }
            }
            cells.push(text.trim().to_string());
        }
        rows.push(cells);
    }
    rows
}

/// Concatenate the text runs of one paragraph.
fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}
