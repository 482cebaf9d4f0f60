//! Writing datasets out for charting and further analysis
//!
//! Tables are written whole, in one of three formats chosen explicitly or
//! from the file extension.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use arrow::json::LineDelimitedWriter;
use parquet::arrow::ArrowWriter;

use crate::dataset::Dataset;
use crate::error::util::validate_directory;
use crate::error::{AnalysisError, Result};
use crate::loader::write_csv;
use crate::utils::logging::{Transfer, log_transfer_complete, log_transfer_start};

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    /// One JSON object per row
    JsonLines,
    Parquet,
}

impl ExportFormat {
    /// File extension written by this format
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::JsonLines => "jsonl",
            Self::Parquet => "parquet",
        }
    }

    /// Pick a format from a path's extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json" | "jsonl" | "ndjson") => Ok(Self::JsonLines),
            Some("parquet") => Ok(Self::Parquet),
            _ => Err(AnalysisError::format(format!(
                "Cannot infer export format from {}",
                path.display()
            ))),
        }
    }

    /// Parse a format name such as `csv`, `jsonl` or `parquet`
    pub fn from_name(name: &str) -> Result<Self> {
        Self::from_path(Path::new(&format!("out.{name}")))
    }
}

/// Write a dataset to `path` in the given format
///
/// The parent directory must already exist.
pub fn export_dataset(dataset: &Dataset, path: &Path, format: ExportFormat) -> Result<()> {
    let start = Instant::now();
    log_transfer_start(Transfer::Write, "dataset to", path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        validate_directory(parent, "exporting a dataset")?;
    }

    let file = File::create(path)?;
    match format {
        ExportFormat::Csv => {
            let mut writer = BufWriter::new(file);
            write_csv(dataset, &mut writer, b',')?;
            writer.flush()?;
        }
        ExportFormat::JsonLines => {
            let mut writer = LineDelimitedWriter::new(BufWriter::new(file));
            writer.write(dataset.batch())?;
            writer.finish()?;
        }
        ExportFormat::Parquet => {
            let mut writer = ArrowWriter::try_new(file, dataset.schema(), None)?;
            writer.write(dataset.batch())?;
            writer.close()?;
        }
    }

    log_transfer_complete(Transfer::Write, path, dataset.num_rows(), start.elapsed());
    Ok(())
}

/// Write named tables into `dir` as `<name>.<ext>`
///
/// Returns the written paths in input order.
pub fn export_tables(
    tables: &[(&str, &Dataset)],
    dir: &Path,
    format: ExportFormat,
) -> Result<Vec<PathBuf>> {
    validate_directory(dir, "exporting tables")?;

    tables
        .iter()
        .map(|(name, dataset)| {
            let path = dir.join(format!("{name}.{}", format.extension()));
            export_dataset(dataset, &path, format)?;
            Ok(path)
        })
        .collect()
}
