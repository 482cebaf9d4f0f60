//! Numeric validation and missing-value diagnostics.
//!
//! Nothing here mutates or filters a dataset: the functions only report
//! which fields hold cells that cannot be read as numbers and where the
//! missing values are.

use arrow::array::{Array, ArrayRef};
use arrow::datatypes::DataType;
use itertools::Itertools;
use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::utils::arrow::{is_blank, is_numeric_type, is_text_type, parse_numeric, text_values};

/// A field holding at least one non-numeric cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumericIssue {
    /// Field name
    pub field: String,
    /// Number of offending cells
    pub count: usize,
    /// Row of the first offending cell
    pub first_row: usize,
    /// Text of the first offending cell
    pub first_value: String,
}

/// Outcome of scanning a dataset for non-numeric cells
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NumericValidationReport {
    /// Whether every checked cell is numeric or missing
    pub valid: bool,
    /// Offending fields in schema order
    pub issues: Vec<NumericIssue>,
}

impl NumericValidationReport {
    /// Names of the offending fields in schema order
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.field.clone()).collect()
    }
}

/// Offending `(row, text)` cells of one column
fn non_numeric_cells(column: &ArrayRef) -> Result<Vec<(usize, String)>> {
    let data_type = column.data_type();

    if is_text_type(data_type) {
        return Ok(text_values(column)?
            .into_iter()
            .enumerate()
            .filter_map(|(row, cell)| match cell {
                Some(s) if !is_blank(&s) && parse_numeric(&s).is_none() => Some((row, s)),
                _ => None,
            })
            .collect());
    }

    if is_numeric_type(data_type) || matches!(data_type, DataType::Boolean | DataType::Null) {
        return Ok(Vec::new());
    }

    Ok((0..column.len())
        .filter(|row| column.is_valid(*row))
        .map(|row| (row, format!("<{data_type}>")))
        .collect())
}

/// Scan every non-identifier field for cells that are not numbers
///
/// Null and blank cells are not offenders; they are left to the null filter.
pub fn validate_numeric<S: AsRef<str>>(
    dataset: &Dataset,
    identifiers: &[S],
) -> Result<NumericValidationReport> {
    let mut issues = Vec::new();

    for (field, column) in dataset
        .schema()
        .fields()
        .iter()
        .zip(dataset.batch().columns())
    {
        if identifiers.iter().any(|id| id.as_ref() == field.name()) {
            continue;
        }

        let bad = non_numeric_cells(column)?;
        if let Some((first_row, first_value)) = bad.first().cloned() {
            log::debug!(
                "Field '{}' has {} non-numeric cells, first '{}' at row {}",
                field.name(),
                bad.len(),
                first_value,
                first_row
            );
            issues.push(NumericIssue {
                field: field.name().clone(),
                count: bad.len(),
                first_row,
                first_value,
            });
        }
    }

    if !issues.is_empty() {
        log::warn!(
            "Non-numeric values found in fields: {}",
            issues.iter().map(|i| i.field.as_str()).join(", ")
        );
    }

    Ok(NumericValidationReport {
        valid: issues.is_empty(),
        issues,
    })
}

/// Names of the non-identifier fields holding at least one non-numeric cell
pub fn non_numeric_fields<S: AsRef<str>>(dataset: &Dataset, identifiers: &[S]) -> Result<Vec<String>> {
    Ok(validate_numeric(dataset, identifiers)?.field_names())
}

/// Number of missing (null or blank) cells in a column
fn missing_count(column: &ArrayRef) -> Result<usize> {
    if is_text_type(column.data_type()) {
        return Ok(text_values(column)?
            .iter()
            .filter(|cell| cell.as_deref().is_none_or(is_blank))
            .count());
    }
    Ok(column.null_count())
}

/// Missing-cell count per field, most missing first, ties in schema order
pub fn null_counts(dataset: &Dataset) -> Result<Vec<(String, usize)>> {
    let counts = dataset
        .schema()
        .fields()
        .iter()
        .zip(dataset.batch().columns())
        .map(|(field, column)| Ok((field.name().clone(), missing_count(column)?)))
        .collect::<Result<Vec<_>>>()?;

    Ok(counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .collect())
}

/// Fields with at least one missing cell, in schema order
pub fn fields_with_nulls(dataset: &Dataset) -> Result<Vec<String>> {
    dataset
        .schema()
        .fields()
        .iter()
        .zip(dataset.batch().columns())
        .filter_map(|(field, column)| match missing_count(column) {
            Ok(0) => None,
            Ok(_) => Some(Ok(field.name().clone())),
            Err(e) => Some(Err(e)),
        })
        .collect()
}
