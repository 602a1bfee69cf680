//! Spreadsheet extraction via calamine.
//!
//! Only the first sheet is read, as one [`Dataset`] with the first row
//! as header. Structural parsing is delegated entirely to calamine; the
//! `.xls` / `.xlsx` reader split is decided by extension upstream, never
//! by content.

use crate::dataset::Dataset;
use crate::error::Doc2ChartError;
use crate::extract::DocumentFormat;
use calamine::{open_workbook, Data, Reader, Xls, Xlsx};
use std::path::Path;
use tracing::debug;

/// Extract the first sheet of the workbook at `path` as a single dataset.
pub fn extract(path: &Path, format: DocumentFormat) -> Result<Vec<Dataset>, Doc2ChartError> {
    let rows = match format {
        DocumentFormat::SpreadsheetXls => {
            let mut workbook: Xls<_> = open_workbook(path).map_err(corrupt)?;
            first_sheet_rows(&mut workbook)?
        }
        DocumentFormat::SpreadsheetXlsx => {
            let mut workbook: Xlsx<_> = open_workbook(path).map_err(corrupt)?;
            first_sheet_rows(&mut workbook)?
        }
        // The router only dispatches spreadsheet formats here.
        other => {
            return Err(Doc2ChartError::Internal(format!(
                "sheet extractor called with {other:?}"
            )))
        }
    };

    match Dataset::from_raw_rows(rows) {
        Some(dataset) => {
            debug!("Extracted first sheet with {} data rows", dataset.len());
            Ok(vec![dataset])
        }
        None => Err(Doc2ChartError::NoTablesFound {
            kind: "spreadsheet",
        }),
    }
}

fn corrupt<E: std::fmt::Display>(e: E) -> Doc2ChartError {
    Doc2ChartError::CorruptDocument {
        kind: "spreadsheet",
        detail: e.to_string(),
    }
}

/// Read the first sheet's used range as trimmed cell strings, skipping
/// fully empty rows.
fn first_sheet_rows<R>(workbook: &mut R) -> Result<Vec<Vec<String>>, Doc2ChartError>
where
    R: Reader<std::io::BufReader<std::fs::File>>,
    R::Error: std::fmt::Display,
{
    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Err(Doc2ChartError::NoTablesFound {
            kind: "spreadsheet",
        });
    };
    let range = workbook.worksheet_range(&sheet_name).map_err(corrupt)?;

    let mut rows = Vec::new();
    for row in range.rows() {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        if cells.iter().any(|c| !c.is_empty()) {
            rows.push(cells);
        }
    }
    Ok(rows)
}

/// Render one cell the way it would read in the sheet. Whole floats lose
/// their ".0" so a numeric column round-trips through the bucketizer's
/// `f64` parse unchanged.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn xlsx_fixture(rows: &[&[&str]]) -> tempfile::NamedTempFile {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if let Ok(v) = cell.parse::<f64>() {
                    sheet.write_number(r as u32, c as u16, v).unwrap();
                } else {
                    sheet.write_string(r as u32, c as u16, *cell).unwrap();
                }
            }
        }
        let tmp = tempfile::NamedTempFile::with_suffix(".xlsx").unwrap();
        workbook.save(tmp.path()).unwrap();
        tmp
    }

    #[test]
    fn first_row_is_header_rest_are_rows() {
        let tmp = xlsx_fixture(&[
            &["name", "score"],
            &["ada", "95"],
            &["grace", "88.5"],
        ]);
        let tables = extract(tmp.path(), DocumentFormat::SpreadsheetXlsx).unwrap();
        assert_eq!(tables.len(), 1);
        let ds = &tables[0];
        assert_eq!(ds.columns(), ["name", "score"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[0], vec!["ada".to_string(), "95".to_string()]);
        assert_eq!(ds.rows()[1], vec!["grace".to_string(), "88.5".to_string()]);
    }

    #[test]
    fn garbage_file_is_corrupt() {
        let mut tmp = tempfile::NamedTempFile::with_suffix(".xlsx").unwrap();
        use std::io::Write;
        tmp.write_all(b"not a workbook").unwrap();
        let err = extract(tmp.path(), DocumentFormat::SpreadsheetXlsx).unwrap_err();
        assert!(matches!(err, Doc2ChartError::CorruptDocument { .. }));
    }
}
