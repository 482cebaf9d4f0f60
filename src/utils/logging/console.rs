//! Console output utilities
//!
//! This module provides utilities for formatted console output.

use arrow::util::pretty::pretty_format_batches;

use crate::dataset::Dataset;
use crate::error::Result;

/// Render the first `num_rows` rows of a dataset as an ASCII table
pub fn format_preview(dataset: &Dataset, num_rows: usize) -> Result<String> {
    let rows = num_rows.min(dataset.num_rows());
    let head = dataset.batch().slice(0, rows);
    Ok(pretty_format_batches(&[head])?.to_string())
}

/// Format a labelled figure for the report log
#[must_use]
pub fn format_report_line(label: &str, value: f64) -> String {
    format!("{label:<40} {value:>14.3}")
}
