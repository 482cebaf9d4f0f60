//! Core filtering functionality
//!
//! Row selection over Arrow record batches via boolean masks, and the
//! `BatchFilter` trait implemented by the quality and completeness filters.

use std::collections::HashSet;

use arrow::array::{ArrayRef, BooleanArray};
use arrow::compute::filter as arrow_filter;
use arrow::record_batch::RecordBatch;

use crate::error::{AnalysisError, Result};

/// Filter a record batch based on a boolean mask
///
/// Rows where the mask is true are kept, in original order. Null mask
/// entries drop the row.
///
/// # Errors
/// Returns an error if the mask length differs from the row count
pub fn filter_record_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if batch.num_rows() != mask.len() {
        return Err(AnalysisError::schema(format!(
            "Mask length ({}) doesn't match batch row count ({})",
            mask.len(),
            batch.num_rows()
        )));
    }

    let filtered_columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .map(|col| arrow_filter(col, mask))
        .collect::<std::result::Result<_, _>>()?;

    Ok(RecordBatch::try_new(batch.schema(), filtered_columns)?)
}

/// Trait for objects that select rows of a record batch
pub trait BatchFilter: std::fmt::Debug {
    /// Compute the keep-mask for a batch
    fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray>;

    /// Returns the set of column names required by this filter
    fn required_columns(&self) -> HashSet<String>;

    /// Filter a record batch, keeping rows selected by [`BatchFilter::mask`]
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mask = self.mask(batch)?;
        filter_record_batch(batch, &mask)
    }
}
