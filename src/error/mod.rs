//! Error handling for the analysis pipeline.

pub mod util;

use std::io;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Errors raised by the pipeline stages
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Malformed input, e.g. a missing or broken header row
    #[error("Format error: {0}")]
    Format(String),

    /// An expected field is absent or holds values outside its domain
    #[error("Schema error: {0}")]
    Schema(String),

    /// A referenced field is absent or has the wrong type for the operation
    #[error("Field error: {0}")]
    Field(String),

    /// Error opening, reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from an Arrow kernel or reader
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error writing Parquet output
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error serializing a report
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error converting record batches into typed records
    #[error("Record conversion error: {0}")]
    SerdeArrow(#[from] serde_arrow::Error),
}

impl AnalysisError {
    /// Create a format error
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Create a field error
    pub fn field(message: impl Into<String>) -> Self {
        Self::Field(message.into())
    }

    /// Create the field error used whenever a column lookup fails
    #[must_use]
    pub fn field_not_found(name: &str) -> Self {
        Self::Field(format!("Field '{name}' not found"))
    }
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
