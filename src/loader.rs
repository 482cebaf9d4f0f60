//! Delimited text loading
//!
//! Reads a CSV source with a header row into a [`Dataset`] whose fields are
//! all nullable text. Keeping the raw text means non-numeric cells survive
//! loading and can be reported by the validator; typed conversion happens
//! once rows are known to be complete.

use std::collections::HashSet;
use std::io::{Read, Seek, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::record_batch::RecordBatch;
use arrow_schema::{DataType, Field, Schema, SchemaRef};

use crate::config::LoaderConfig;
use crate::dataset::Dataset;
use crate::error::util::safe_open_file;
use crate::error::{AnalysisError, Result};
use crate::utils::logging::{Transfer, log_transfer_complete, log_transfer_start};

/// Load a CSV file into a dataset
pub fn load_csv(path: &Path, config: &LoaderConfig) -> Result<Dataset> {
    let start = Instant::now();
    log_transfer_start(Transfer::Read, "CSV file", path);

    let file = safe_open_file(path, "loading the cost-of-living table")?;
    let dataset = read_csv(file, config).map_err(|e| match e {
        AnalysisError::Format(msg) => {
            AnalysisError::format(format!("{msg} (file: {})", path.display()))
        }
        other => other,
    })?;

    log_transfer_complete(Transfer::Read, path, dataset.num_rows(), start.elapsed());
    Ok(dataset)
}

/// Read CSV from any seekable source into a dataset
///
/// Field order follows the header and row order follows the source. Empty
/// cells load as nulls.
///
/// # Errors
/// Returns a `FormatError` if the header is absent or malformed, or a row
/// has the wrong number of cells.
pub fn read_csv<R: Read + Seek>(mut reader: R, config: &LoaderConfig) -> Result<Dataset> {
    let format = Format::default()
        .with_header(true)
        .with_delimiter(config.delimiter);

    let (inferred, _) = format
        .infer_schema(&mut reader, Some(0))
        .map_err(|e| AnalysisError::format(format!("Failed to read header row: {e}")))?;
    reader.rewind()?;

    let schema = text_schema(&inferred)?;

    let csv_reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_header(true)
        .with_delimiter(config.delimiter)
        .with_batch_size(config.batch_size.max(1))
        .build(reader)?;

    let batches = csv_reader
        .collect::<std::result::Result<Vec<RecordBatch>, _>>()
        .map_err(|e| AnalysisError::format(format!("Malformed CSV row: {e}")))?;

    Ok(Dataset::new(concat_batches(&schema, &batches)?))
}

/// Write a dataset as CSV with a header row
///
/// Nulls are written as empty cells, so [`read_csv`] restores them.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W, delimiter: u8) -> Result<()> {
    let mut csv_writer = WriterBuilder::new()
        .with_header(true)
        .with_delimiter(delimiter)
        .build(writer);
    csv_writer.write(dataset.batch())?;
    Ok(())
}

/// Turn the header names into an all-text schema, rejecting broken headers
fn text_schema(inferred: &Schema) -> Result<SchemaRef> {
    if inferred.fields().is_empty() {
        return Err(AnalysisError::format("Missing header row"));
    }

    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(inferred.fields().len());
    for (idx, field) in inferred.fields().iter().enumerate() {
        let name = field.name().trim();
        if name.is_empty() {
            return Err(AnalysisError::format(format!(
                "Header column {} has an empty name",
                idx + 1
            )));
        }
        if !seen.insert(name.to_string()) {
            return Err(AnalysisError::format(format!(
                "Header contains duplicate column '{name}'"
            )));
        }
        fields.push(Field::new(name, DataType::Utf8, true));
    }

    Ok(Arc::new(Schema::new(fields)))
}
