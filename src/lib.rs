//! A Rust library for cleaning and analysing city-level cost-of-living
//! tables: quality-flag partitioning, numeric validation, incomplete-row
//! removal, descriptive statistics and a derived disposable income metric.

pub mod config;
pub mod dataset;
pub mod derived;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod pipeline;
pub mod schema;
pub mod stats;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{AnalysisConfig, LoaderConfig};
pub use dataset::Dataset;
pub use error::{AnalysisError, Result};
pub use pipeline::{
    AnalysisOutcome, AnalysisReport, analyze, analyze_with_labels, run_pipeline,
};

// Arrow types
pub use arrow::datatypes::Schema as ArrowSchema;
pub use arrow::record_batch::RecordBatch;

// Pipeline stages
pub use derived::{CostFields, MEALS_PER_MONTH, meal_comparison, with_disposable_income};
pub use export::{ExportFormat, export_dataset, export_tables};
pub use filter::{QualityPartition, drop_incomplete_rows, split_by_quality};
pub use loader::{load_csv, read_csv, write_csv};
pub use schema::{FieldLabels, load_field_labels, non_numeric_fields, validate_numeric};
pub use stats::{ColumnSummary, bottom_n, describe, top_n, value_counts};
