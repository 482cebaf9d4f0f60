//! Removal of incomplete rows
//!
//! A cell is missing when it is null or blank, or, outside the identifier
//! fields, when it cannot be read as a finite number. Rows with any missing
//! cell are dropped and the surviving numeric fields are converted to
//! `Float64`, producing a cleaned dataset.

use std::collections::HashSet;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use arrow_schema::{Field, Schema};
use itertools::Itertools;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::filter::core::BatchFilter;
use crate::utils::arrow::{
    is_blank, is_numeric_type, is_text_type, numeric_values, parse_numeric, text_values,
    to_float64,
};

/// Per-cell presence for one column
fn present_cells(column: &ArrayRef, name: &str, numeric: bool) -> Result<Vec<bool>> {
    let data_type = column.data_type();

    if is_text_type(data_type) {
        return Ok(text_values(column)?
            .into_iter()
            .map(|cell| match cell {
                Some(s) if numeric => parse_numeric(&s).is_some(),
                Some(s) => !is_blank(&s),
                None => false,
            })
            .collect());
    }

    if numeric && is_numeric_type(data_type) {
        return Ok(numeric_values(column, name)?
            .into_iter()
            .map(|v| v.is_some())
            .collect());
    }

    Ok((0..column.len()).map(|row| column.is_valid(row)).collect())
}

/// Keeps rows with a value in every field
#[derive(Debug, Clone, Default)]
pub struct CompleteRowFilter {
    identifiers: HashSet<String>,
}

impl CompleteRowFilter {
    /// Create a filter treating `identifiers` as text fields and every other
    /// field as numeric
    #[must_use]
    pub fn new<S: AsRef<str>>(identifiers: &[S]) -> Self {
        Self {
            identifiers: identifiers.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    fn is_identifier(&self, name: &str) -> bool {
        self.identifiers.contains(name)
    }
}

impl BatchFilter for CompleteRowFilter {
    fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        let mut keep = vec![true; batch.num_rows()];

        for (field, column) in batch.schema_ref().fields().iter().zip(batch.columns()) {
            let numeric = !self.is_identifier(field.name());
            let present = present_cells(column, field.name(), numeric)?;
            for (k, p) in keep.iter_mut().zip(present) {
                *k &= p;
            }
        }

        Ok(BooleanArray::from(keep))
    }

    fn required_columns(&self) -> HashSet<String> {
        HashSet::new()
    }
}

/// Result of dropping incomplete rows
#[derive(Debug, Clone, PartialEq)]
pub struct NullFilterOutcome {
    /// Complete rows, numeric fields typed `Float64`
    pub dataset: Dataset,
    /// Number of rows removed
    pub removed: usize,
}

/// Drop every row with a missing value and type the numeric fields
///
/// Re-applying to a cleaned dataset removes nothing.
pub fn drop_incomplete_rows<S: AsRef<str>>(
    dataset: &Dataset,
    identifiers: &[S],
) -> Result<NullFilterOutcome> {
    let filter = CompleteRowFilter::new(identifiers);
    let kept = Dataset::new(filter.filter(dataset.batch())?);
    let removed = dataset.num_rows() - kept.num_rows();

    let cleaned = convert_numeric_fields(&kept, &filter)?;

    log::info!(
        "Removed {} incomplete rows ({} -> {})",
        removed,
        dataset.num_rows(),
        cleaned.num_rows()
    );

    Ok(NullFilterOutcome {
        dataset: cleaned,
        removed,
    })
}

/// Cast every non-identifier text or numeric field to non-null `Float64`
fn convert_numeric_fields(dataset: &Dataset, filter: &CompleteRowFilter) -> Result<Dataset> {
    let schema = dataset.schema();
    let (fields, columns): (Vec<Field>, Vec<ArrayRef>) = schema
        .fields()
        .iter()
        .zip(dataset.batch().columns())
        .map(|(field, column)| -> Result<(Field, ArrayRef)> {
            let convertible = !filter.is_identifier(field.name())
                && (is_text_type(field.data_type()) || is_numeric_type(field.data_type()));
            if convertible {
                let converted = to_float64(column, field.name())?;
                Ok((Field::new(field.name(), DataType::Float64, false), converted))
            } else {
                Ok((field.as_ref().clone(), Arc::clone(column)))
            }
        })
        .process_results(|iter| iter.unzip())?;

    let schema = Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone()));
    Dataset::try_new(schema, columns)
}
