//! Field-level checks and metadata for loaded datasets.

pub mod labels;
pub mod validate;

pub use labels::{FieldLabels, load_field_labels, read_field_labels};
pub use validate::{
    NumericIssue, NumericValidationReport, fields_with_nulls, non_numeric_fields, null_counts,
    validate_numeric,
};
