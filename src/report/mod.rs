//! Report generation: bucketed counts to four artifacts plus an HTML
//! preview.
//!
//! Each submodule produces exactly one kind of output:
//!
//! 1. [`charts`]   — pie, line, and bar chart PNGs via plotters
//! 2. [`workbook`] — the filtered dataset with embedded chart images
//! 3. [`html`]     — the upload form, preview table, and result page
//!
//! [`generate`] orchestrates them for one request, writing everything
//! into the report's own directory, and drops a `summary.json` sidecar
//! beside the artifacts so a report can be understood without replaying
//! the request.

pub mod charts;
pub mod html;
pub mod workbook;

use crate::bucket::{BucketedSeries, ColumnAnalysis};
use crate::error::Doc2ChartError;
use serde::Serialize;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Artifact file names, fixed per report directory.
pub const PIE_CHART: &str = "pie_chart.png";
pub const LINE_CHART: &str = "line_chart.png";
pub const BAR_CHART: &str = "bar_chart.png";
pub const WORKBOOK: &str = "data.xlsx";
pub const SUMMARY: &str = "summary.json";

/// The downloadable artifacts every report produces, in a fixed order.
pub const ARTIFACTS: [&str; 4] = [PIE_CHART, LINE_CHART, BAR_CHART, WORKBOOK];

/// Machine-readable description of one generated report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub report_id: String,
    pub source_filename: String,
    pub column: String,
    pub rows_kept: usize,
    pub rows_dropped: usize,
    pub bucket_counts: BucketedSeries,
    /// Seconds since the Unix epoch at generation time.
    pub created_unix: u64,
}

/// A finished report: its id plus the rendered result page.
#[derive(Debug, Clone)]
pub struct Report {
    pub id: String,
    pub page: String,
}

/// Render all artifacts for `analysis` into `dir` and return the report.
pub fn generate(
    dir: &Path,
    report_id: &str,
    source_filename: &str,
    analysis: &ColumnAnalysis,
) -> Result<Report, Doc2ChartError> {
    charts::render_all(dir, &analysis.column, &analysis.series)?;
    workbook::write(dir, analysis)?;

    let summary = ReportSummary {
        report_id: report_id.to_string(),
        source_filename: source_filename.to_string(),
        column: analysis.column.clone(),
        rows_kept: analysis.filtered.len(),
        rows_dropped: analysis.dropped_rows,
        bucket_counts: analysis.series.clone(),
        created_unix: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0),
    };
    let summary_path = dir.join(SUMMARY);
    let json = serde_json::to_vec_pretty(&summary)
        .map_err(|e| Doc2ChartError::Internal(format!("summary serialisation: {e}")))?;
    std::fs::write(&summary_path, json).map_err(|e| Doc2ChartError::OutputWriteFailed {
        path: summary_path,
        source: e,
    })?;

    info!(
        "Generated report {report_id}: {} rows, {} buckets filled",
        analysis.filtered.len(),
        analysis.series.iter().filter(|(_, c)| *c > 0).count(),
    );

    Ok(Report {
        id: report_id.to_string(),
        page: html::result_page(report_id, analysis),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::bucketize;
    use crate::dataset::Dataset;

    #[test]
    fn generate_writes_all_artifacts_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = Dataset::new(
            vec!["score".into()],
            vec![vec!["5".into()], vec!["95".into()], vec!["abc".into()]],
        );
        let analysis = bucketize(dataset, "score").unwrap();

        let report = generate(dir.path(), "test-id", "grades.xlsx", &analysis).unwrap();
        assert_eq!(report.id, "test-id");
        assert!(report.page.contains("test-id/data.xlsx"));

        for artifact in ARTIFACTS {
            assert!(dir.path().join(artifact).is_file(), "{artifact} missing");
        }
        let summary: serde_json::Value =
            serde_json::from_slice(&std::fs::read(dir.path().join(SUMMARY)).unwrap()).unwrap();
        assert_eq!(summary["rows_kept"], 2);
        assert_eq!(summary["rows_dropped"], 1);
        assert_eq!(summary["source_filename"], "grades.xlsx");
    }
}
