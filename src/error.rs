//! Error types for the doc2chart library.
//!
//! One enum covers every way a request can fail. The split that matters
//! to callers is not the variant itself but whether the *client* caused
//! the failure (bad upload, unsupported format, missing column) or the
//! *server* did (chart renderer broke, disk full). [`Doc2ChartError::is_bad_request`]
//! encodes that split once so the HTTP layer maps errors to status codes
//! without a second match over the variants.
//!
//! All failures are terminal for the request; there are no retries
//! anywhere in the pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the doc2chart pipeline.
#[derive(Debug, Error)]
pub enum Doc2ChartError {
    // ── Request errors ────────────────────────────────────────────────────
    /// The multipart body had no `file` part.
    #[error("No file part\nSubmit the form with a file in the 'file' field.")]
    MissingFilePart,

    /// A `file` part was present but its filename was empty.
    #[error("No selected file")]
    EmptyFilename,

    /// The multipart body had no `column_name` part.
    #[error("No column name\nSubmit the form with the name of a numeric column in 'column_name'.")]
    MissingColumnName,

    /// The filename extension is not one of pdf/docx/xls/xlsx.
    #[error("Unsupported file type: '.{extension}'\nSupported: .pdf, .docx, .xls, .xlsx")]
    UnsupportedFormat { extension: String },

    /// The filename has no extension to sniff a format from.
    #[error("Unsupported file type: the filename has no extension\nSupported: .pdf, .docx, .xls, .xlsx")]
    NoFileExtension,

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The document parsed but contained no detectable table.
    #[error("No tables found in the {kind} document.")]
    NoTablesFound { kind: &'static str },

    /// The parser rejected the document outright.
    #[error("Could not read the {kind} document: {detail}")]
    CorruptDocument { kind: &'static str, detail: String },

    // ── Bucketing errors ──────────────────────────────────────────────────
    /// The caller named a column the merged dataset does not have.
    #[error("Column '{column}' not found in the extracted table.\nAvailable columns: {available}")]
    ColumnNotFound { column: String, available: String },

    // ── Report errors ─────────────────────────────────────────────────────
    /// A chart failed to render to its PNG.
    #[error("Failed to render {chart} chart: {detail}")]
    ChartRenderFailed { chart: &'static str, detail: String },

    /// The output workbook could not be built or saved.
    #[error("Failed to write workbook '{path}': {detail}")]
    WorkbookWriteFailed { path: PathBuf, detail: String },

    /// An artifact or sidecar file could not be written.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Doc2ChartError {
    /// Whether the client caused this failure (HTTP 400) rather than the
    /// server (HTTP 500).
    ///
    /// `CorruptDocument` counts as a bad request: the bytes the client
    /// uploaded could not be parsed, which is the same class of failure
    /// as "no tables found".
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            Doc2ChartError::MissingFilePart
                | Doc2ChartError::EmptyFilename
                | Doc2ChartError::MissingColumnName
                | Doc2ChartError::UnsupportedFormat { .. }
                | Doc2ChartError::NoFileExtension
                | Doc2ChartError::NoTablesFound { .. }
                | Doc2ChartError::CorruptDocument { .. }
                | Doc2ChartError::ColumnNotFound { .. }
        )
    }
}
