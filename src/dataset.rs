//! Tabular data model: the [`Dataset`] passed between extraction,
//! bucketing, and reporting.
//!
//! Every extractor produces one `Dataset` per detected table, using the
//! table's first row as the header. [`merge`] then concatenates them into
//! the single dataset the rest of the pipeline works on.
//!
//! ## Merging tables with different headers
//!
//! Nothing stops a document from containing two tables with different
//! column sets. We merge them best-effort: the merged header is the first
//! table's columns followed by any previously unseen columns in order of
//! appearance, and each row's cells are aligned by column *name*, with
//! empty strings where a row's source table lacked a column. Tables that
//! share one header shape concatenate losslessly.

/// An ordered collection of rows sharing one column header set.
///
/// Invariant: every row has exactly `columns.len()` cells. Rows are
/// normalised at construction — short rows padded with empty strings,
/// long rows truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Build a dataset from a header and data rows, normalising each row
    /// to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Build a dataset from raw table rows, taking the first row as the
    /// header. Returns `None` for an empty table.
    pub fn from_raw_rows(mut raw: Vec<Vec<String>>) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        let header = raw.remove(0);
        Some(Self::new(header, raw))
    }

    /// Column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows (the header is not a row).
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Keep only the rows at the given indices, preserving order.
    pub(crate) fn retain_rows(&mut self, keep: &[usize]) {
        let mut kept = Vec::with_capacity(keep.len());
        for &i in keep {
            kept.push(std::mem::take(&mut self.rows[i]));
        }
        self.rows = kept;
    }

    /// Mutable access to a single cell. Panics on out-of-range indices,
    /// which the invariant rules out for indices from `column_index`.
    pub(crate) fn set_cell(&mut self, row: usize, col: usize, value: String) {
        self.rows[row][col] = value;
    }
}

/// Concatenate extracted datasets into one, aligning columns by name.
///
/// Returns `None` when `datasets` is empty — the caller turns that into
/// its "no tables found" failure.
pub fn merge(datasets: Vec<Dataset>) -> Option<Dataset> {
    let mut iter = datasets.into_iter();
    let first = iter.next()?;

    let mut columns = first.columns.clone();
    let mut parts = vec![first];
    for ds in iter {
        for col in &ds.columns {
            if !columns.contains(col) {
                columns.push(col.clone());
            }
        }
        parts.push(ds);
    }

    let mut rows = Vec::new();
    for part in &parts {
        // Map each source column to its position in the merged header.
        let targets: Vec<usize> = part
            .columns
            .iter()
            .map(|c| columns.iter().position(|m| m == c).unwrap_or(usize::MAX))
            .collect();
        for row in &part.rows {
            let mut merged = vec![String::new(); columns.len()];
            for (cell, &target) in row.iter().zip(&targets) {
                if target != usize::MAX {
                    merged[target] = cell.clone();
                }
            }
            rows.push(merged);
        }
    }

    Some(Dataset { columns, rows })
}
