//! Partitioning rows by the data-quality flag
//!
//! The source table marks every city with `1` when enough contributors back
//! its figures and `0` otherwise. Splitting yields two disjoint datasets in
//! original row order, both with the flag column removed.

use std::collections::HashSet;

use arrow::array::{Array, AsArray, BooleanArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::dataset::Dataset;
use crate::error::{AnalysisError, Result};
use crate::filter::core::BatchFilter;
use crate::utils::arrow::numeric_values;

/// Reliability class of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    /// Flag value `1`
    Good,
    /// Flag value `0`
    Bad,
}

impl Quality {
    /// Numeric value of the flag for this class
    #[must_use]
    pub const fn sentinel(self) -> f64 {
        match self {
            Self::Good => 1.0,
            Self::Bad => 0.0,
        }
    }

    fn from_value(value: f64) -> Option<Self> {
        if value == Self::Good.sentinel() {
            Some(Self::Good)
        } else if value == Self::Bad.sentinel() {
            Some(Self::Bad)
        } else {
            None
        }
    }
}

/// Classify every row of `batch` by the flag in `field`
///
/// # Errors
/// Returns a `SchemaError` if the field is absent, or holds a null or any
/// value other than `0`/`1`.
pub fn quality_flags(batch: &RecordBatch, field: &str) -> Result<Vec<Quality>> {
    let idx = batch.schema_ref().index_of(field).map_err(|_| {
        AnalysisError::schema(format!("Quality field '{field}' not found"))
    })?;
    let column = batch.column(idx);

    if matches!(column.data_type(), DataType::Boolean) {
        let flags = column.as_boolean();
        return (0..flags.len())
            .map(|row| {
                if flags.is_null(row) {
                    Err(missing_flag(field, row))
                } else if flags.value(row) {
                    Ok(Quality::Good)
                } else {
                    Ok(Quality::Bad)
                }
            })
            .collect();
    }

    let values = numeric_values(column, field)
        .map_err(|e| AnalysisError::schema(format!("Quality field '{field}' is not a flag: {e}")))?;

    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            let value = value.ok_or_else(|| missing_flag(field, row))?;
            Quality::from_value(value).ok_or_else(|| {
                AnalysisError::schema(format!(
                    "Quality field '{field}' has value {value} at row {row}; expected 0 or 1"
                ))
            })
        })
        .collect()
}

fn missing_flag(field: &str, row: usize) -> AnalysisError {
    AnalysisError::schema(format!("Quality field '{field}' is missing at row {row}"))
}

/// Keeps rows whose quality flag matches one class
#[derive(Debug, Clone)]
pub struct QualityFilter {
    field: String,
    quality: Quality,
}

impl QualityFilter {
    #[must_use]
    pub fn new(field: impl Into<String>, quality: Quality) -> Self {
        Self {
            field: field.into(),
            quality,
        }
    }
}

impl BatchFilter for QualityFilter {
    fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray> {
        let flags = quality_flags(batch, &self.field)?;
        Ok(flags.iter().map(|q| Some(*q == self.quality)).collect())
    }

    fn required_columns(&self) -> HashSet<String> {
        HashSet::from([self.field.clone()])
    }
}

/// The two disjoint halves of a dataset split by quality
#[derive(Debug, Clone, PartialEq)]
pub struct QualityPartition {
    /// Rows flagged `1`
    pub good: Dataset,
    /// Rows flagged `0`
    pub bad: Dataset,
}

/// Split a dataset by its quality flag and drop the flag from both halves
///
/// # Errors
/// Returns a `SchemaError` if the flag is absent or outside `{0, 1}`.
pub fn split_by_quality(dataset: &Dataset, field: &str) -> Result<QualityPartition> {
    let flags = quality_flags(dataset.batch(), field)?;

    let good_mask: BooleanArray = flags.iter().map(|q| Some(*q == Quality::Good)).collect();
    let bad_mask: BooleanArray = flags.iter().map(|q| Some(*q == Quality::Bad)).collect();

    let good = dataset.filter(&good_mask)?.without_field(field)?;
    let bad = dataset.filter(&bad_mask)?.without_field(field)?;

    log::info!(
        "Split {} rows by '{}': {} good, {} bad",
        dataset.num_rows(),
        field,
        good.num_rows(),
        bad.num_rows()
    );

    Ok(QualityPartition { good, bad })
}
