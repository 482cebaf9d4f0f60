//! Utilities for working with Arrow arrays.
//!
//! Helpers for reading cells out of Arrow columns as numbers or text,
//! regardless of whether the column was loaded as raw text or has already
//! been converted to `Float64`.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Float64Array};
use arrow::compute::kernels::cast::cast;
use arrow::datatypes::{DataType, Float64Type};

use crate::error::{AnalysisError, Result};

/// Whether an Arrow type holds numbers
#[must_use]
pub fn is_numeric_type(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64
    )
}

/// Whether an Arrow type holds text
#[must_use]
pub fn is_text_type(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
    )
}

/// Interpret a text cell as a number.
///
/// Surrounding whitespace is ignored. Non-finite results (`NaN`, `inf`)
/// are rejected.
#[must_use]
pub fn parse_numeric(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whether a text cell carries no value at all
#[must_use]
pub fn is_blank(cell: &str) -> bool {
    cell.trim().is_empty()
}

/// Read a column as optional text, casting non-text columns
pub fn text_values(array: &ArrayRef) -> Result<Vec<Option<String>>> {
    let utf8 = if matches!(array.data_type(), DataType::Utf8) {
        Arc::clone(array)
    } else {
        cast(array, &DataType::Utf8)?
    };

    Ok(utf8
        .as_string::<i32>()
        .iter()
        .map(|cell| cell.map(str::to_string))
        .collect())
}

/// Read a column as optional numbers.
///
/// Null and blank cells become `None`. A text cell that does not parse as a
/// finite number is an error, as is a column of any non-numeric,
/// non-text type.
pub fn numeric_values(array: &ArrayRef, column_name: &str) -> Result<Vec<Option<f64>>> {
    let data_type = array.data_type();

    if is_text_type(data_type) {
        return text_values(array)?
            .into_iter()
            .enumerate()
            .map(|(row, cell)| match cell {
                None => Ok(None),
                Some(s) if is_blank(&s) => Ok(None),
                Some(s) => parse_numeric(&s).map(Some).ok_or_else(|| {
                    AnalysisError::field(format!(
                        "Field '{column_name}' has non-numeric value '{s}' at row {row}"
                    ))
                }),
            })
            .collect();
    }

    if is_numeric_type(data_type) {
        let floats = cast(array, &DataType::Float64)?;
        return Ok(floats
            .as_primitive::<Float64Type>()
            .iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect());
    }

    Err(AnalysisError::field(format!(
        "Field '{column_name}' has non-numeric type {data_type:?}"
    )))
}

/// Convert a fully populated column to a non-null `Float64Array`
pub fn to_float64(array: &ArrayRef, column_name: &str) -> Result<ArrayRef> {
    let values = numeric_values(array, column_name)?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| {
                AnalysisError::field(format!(
                    "Field '{column_name}' has a missing value at row {row}"
                ))
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(Arc::new(Float64Array::from(values)))
}
