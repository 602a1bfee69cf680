//! Table extraction from uploaded documents.
//!
//! Each submodule handles exactly one document family and produces zero
//! or more [`Dataset`]s (one per detected table, first row as header):
//!
//! 1. [`pdf`]   — per-page text via lopdf, line-alignment table detection
//! 2. [`word`]  — every table in the `.docx` body via docx-rs
//! 3. [`sheet`] — first worksheet via calamine (`.xls` and `.xlsx`)
//!
//! All three parsers read from a file-system path. The HTTP layer
//! materialises the uploaded bytes to a [`tempfile::NamedTempFile`] and
//! hands the path here, so deletion is guaranteed by drop on every exit
//! path — success, parse failure, or panic unwind.

pub mod pdf;
pub mod sheet;
pub mod word;

use crate::dataset::Dataset;
use crate::error::Doc2ChartError;
use std::path::Path;

/// The document families we can extract tables from, distinguished by
/// file extension only — no content sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Word,
    /// Legacy binary spreadsheet (`.xls`).
    SpreadsheetXls,
    /// OOXML spreadsheet (`.xlsx`).
    SpreadsheetXlsx,
}

impl DocumentFormat {
    /// Sniff the format from a filename's extension.
    pub fn from_filename(filename: &str) -> Result<Self, Doc2ChartError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Word),
            "xls" => Ok(DocumentFormat::SpreadsheetXls),
            "xlsx" => Ok(DocumentFormat::SpreadsheetXlsx),
            "" => Err(Doc2ChartError::NoFileExtension),
            _ => Err(Doc2ChartError::UnsupportedFormat { extension }),
        }
    }

    /// Human-readable family name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Word => "Word",
            DocumentFormat::SpreadsheetXls | DocumentFormat::SpreadsheetXlsx => "spreadsheet",
        }
    }

    /// Temp-file suffix matching the extension, so parsers that look at
    /// the path see the right one.
    pub fn suffix(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => ".pdf",
            DocumentFormat::Word => ".docx",
            DocumentFormat::SpreadsheetXls => ".xls",
            DocumentFormat::SpreadsheetXlsx => ".xlsx",
        }
    }
}

/// Extract every detectable table from the document at `path`.
///
/// # Errors
/// [`Doc2ChartError::NoTablesFound`] when the document parses but yields
/// no table; [`Doc2ChartError::CorruptDocument`] when it does not parse.
pub fn extract_tables(path: &Path, format: DocumentFormat) -> Result<Vec<Dataset>, Doc2ChartError> {
    match format {
        DocumentFormat::Pdf => pdf::extract(path),
        DocumentFormat::Word => word::extract(path),
        DocumentFormat::SpreadsheetXls | DocumentFormat::SpreadsheetXlsx => {
            sheet::extract(path, format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_dispatch() {
        assert_eq!(
            DocumentFormat::from_filename("report.PDF").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_filename("notes.docx").unwrap(),
            DocumentFormat::Word
        );
        assert_eq!(
            DocumentFormat::from_filename("grades.xls").unwrap(),
            DocumentFormat::SpreadsheetXls
        );
        assert_eq!(
            DocumentFormat::from_filename("grades.xlsx").unwrap(),
            DocumentFormat::SpreadsheetXlsx
        );
    }

    #[test]
    fn unsupported_extensions_rejected() {
        for name in ["notes.txt", "archive.zip"] {
            let err = DocumentFormat::from_filename(name).unwrap_err();
            assert!(
                matches!(err, Doc2ChartError::UnsupportedFormat { .. }),
                "{name} should be unsupported"
            );
        }
    }

    #[test]
    fn extensionless_filenames_get_a_distinct_message() {
        // "trailingdot." sniffs as an empty extension, same as no dot.
        for name in ["noext", "trailingdot."] {
            let err = DocumentFormat::from_filename(name).unwrap_err();
            assert!(
                matches!(err, Doc2ChartError::NoFileExtension),
                "{name} should have no extension"
            );
            assert!(err.to_string().contains("no extension"), "{name}");
        }
    }
}
