//! Numeric coercion and fixed-range bucketing of one dataset column.
//!
//! The ranges are fixed: 0–30, then decade-wide steps up to 100. The
//! first range includes its lower bound; every other range is
//! lower-exclusive, upper-inclusive (31 falls in 30–40, 30 falls in
//! 0–30). Values outside 0–100 coerce fine but land in no bucket, so the
//! sum of bucket counts equals the filtered row count only when every
//! value lies within the overall span.
//!
//! Coercion failures are row-level, never fatal: a cell that does not
//! parse as a number drops its row from the filtered dataset and nothing
//! else. The only fatal failure here is naming a column the dataset does
//! not have.

use crate::dataset::Dataset;
use crate::error::Doc2ChartError;
use serde::Serialize;

/// Number of fixed ranges.
pub const RANGE_COUNT: usize = 8;

/// Upper bound of each range, in order. Lower bounds are the previous
/// entry (exclusive), with the first range starting at an inclusive 0.
const UPPER_BOUNDS: [f64; RANGE_COUNT] = [30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0];

/// Display labels for the fixed ranges, in range order.
pub const RANGE_LABELS: [&str; RANGE_COUNT] = [
    "0-30", "30-40", "40-50", "50-60", "60-70", "70-80", "80-90", "90-100",
];

/// Which fixed range a value falls into, if any.
fn bucket_index(value: f64) -> Option<usize> {
    if !(0.0..=100.0).contains(&value) {
        return None;
    }
    // First matching upper bound wins; the first range absorbs 0 itself.
    UPPER_BOUNDS.iter().position(|&upper| value <= upper)
}

/// Count of values per fixed range, in range order (never sorted by count).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketedSeries {
    counts: [u64; RANGE_COUNT],
}

impl BucketedSeries {
    /// Counts in range order.
    pub fn counts(&self) -> &[u64; RANGE_COUNT] {
        &self.counts
    }

    /// Count for a single range label, e.g. `"30-40"`.
    pub fn get(&self, label: &str) -> Option<u64> {
        RANGE_LABELS
            .iter()
            .position(|&l| l == label)
            .map(|i| self.counts[i])
    }

    /// Sum of all bucket counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(label, count)` pairs in range order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        RANGE_LABELS.iter().copied().zip(self.counts.iter().copied())
    }
}

/// The outcome of coercing and bucketing one column.
#[derive(Debug, Clone)]
pub struct ColumnAnalysis {
    /// The column that was bucketed.
    pub column: String,
    /// Its index in `filtered.columns()`.
    pub column_index: usize,
    /// The dataset with non-numeric rows dropped and the chosen column
    /// rewritten in canonical numeric form ("5", "5.5").
    pub filtered: Dataset,
    /// Parsed value per filtered row, aligned with `filtered.rows()`.
    pub values: Vec<f64>,
    /// Bucket counts in range order.
    pub series: BucketedSeries,
    /// Rows dropped because the column's cell did not parse as a number.
    pub dropped_rows: usize,
}

/// Coerce `column` to numbers, drop rows that refuse, and bucket the rest.
///
/// # Errors
/// [`Doc2ChartError::ColumnNotFound`] when the dataset has no column of
/// that name; the message lists the columns it does have.
pub fn bucketize(dataset: Dataset, column: &str) -> Result<ColumnAnalysis, Doc2ChartError> {
    let Some(column_index) = dataset.column_index(column) else {
        return Err(Doc2ChartError::ColumnNotFound {
            column: column.to_string(),
            available: dataset.columns().join(", "),
        });
    };

    let mut keep = Vec::with_capacity(dataset.len());
    let mut values = Vec::with_capacity(dataset.len());
    for (i, row) in dataset.rows().iter().enumerate() {
        if let Ok(v) = row[column_index].trim().parse::<f64>() {
            if v.is_finite() {
                keep.push(i);
                values.push(v);
            }
        }
    }
    let dropped_rows = dataset.len() - keep.len();

    let mut filtered = dataset;
    filtered.retain_rows(&keep);
    for (row, &v) in values.iter().enumerate() {
        filtered.set_cell(row, column_index, format!("{v}"));
    }

    let mut counts = [0u64; RANGE_COUNT];
    for &v in &values {
        if let Some(bucket) = bucket_index(v) {
            counts[bucket] += 1;
        }
    }

    Ok(ColumnAnalysis {
        column: column.to_string(),
        column_index,
        filtered,
        values,
        series: BucketedSeries { counts },
        dropped_rows,
    })
}
