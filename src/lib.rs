//! # doc2chart
//!
//! Upload a PDF, Word, or spreadsheet document, pick one numeric column,
//! and get back three charts plus a workbook embedding them.
//!
//! ## Why this crate?
//!
//! "Someone mailed me a report, I want a histogram of one column" is a
//! one-minute job that usually turns into opening three different
//! applications. This crate is the whole round trip as one HTTP
//! exchange: extract whatever tables the document has, bucket the chosen
//! column into eight fixed ranges (0–30 up to 90–100), and hand back a
//! report page with the charts inline and the data as `data.xlsx`.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload
//!  │
//!  ├─ 1. Sniff     extension → PDF / Word / spreadsheet
//!  ├─ 2. Extract   tables per document family (lopdf / docx-rs / calamine)
//!  ├─ 3. Merge     concatenate tables, columns aligned by name
//!  ├─ 4. Bucket    coerce the chosen column, count per fixed range
//!  ├─ 5. Render    pie + line + bar PNGs, workbook with embedded charts
//!  └─ 6. Respond   HTML report; artifacts downloadable for one hour
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doc2chart::{server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     server::serve("127.0.0.1:8080".parse()?, config).await?;
//!     Ok(())
//! }
//! ```
//!
//! Each report lives under its own UUID directory and expires after the
//! configured retention window, so concurrent uploads never overwrite
//! each other's artifacts.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doc2chart` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when embedding only the library:
//! ```toml
//! doc2chart = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod bucket;
pub mod config;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod report;
pub mod server;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use bucket::{bucketize, BucketedSeries, ColumnAnalysis, RANGE_COUNT, RANGE_LABELS};
pub use config::{ServerConfig, ServerConfigBuilder};
pub use dataset::{merge, Dataset};
pub use error::Doc2ChartError;
pub use extract::{extract_tables, DocumentFormat};
pub use report::{generate, Report, ReportSummary, ARTIFACTS};
pub use store::ReportStore;
