//! Human-readable names for the coded indicator fields.
//!
//! The source table names its indicators `x1`..`x55`; a separate data
//! dictionary CSV maps each code to a description such as
//! `Average Monthly Net Salary (After Tax) (USD)`. The first column holds the
//! code and the second the description. Header names are not checked, since
//! dictionaries are often exported with an unnamed index column.

use std::collections::BTreeMap;
use std::io::{Read, Seek};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow_schema::{DataType, Field, Schema};
use rustc_hash::FxHashMap;

use crate::config::LoaderConfig;
use crate::error::util::safe_open_file;
use crate::error::{AnalysisError, Result};
use crate::utils::arrow::{is_blank, text_values};
use crate::utils::logging::{Transfer, log_transfer_complete, log_transfer_start};

/// Field code to description lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldLabels {
    labels: FxHashMap<String, String>,
}

impl FieldLabels {
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.labels.get(field).map(String::as_str)
    }

    /// The description of `field`, or the field name when it has none
    #[must_use]
    pub fn display<'a>(&'a self, field: &'a str) -> &'a str {
        self.get(field).unwrap_or(field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels of the given fields that have one, ordered by field name
    #[must_use]
    pub fn subset<'a, I>(&self, fields: I) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        fields
            .into_iter()
            .filter_map(|field| Some((field.to_string(), self.get(field)?.to_string())))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldLabels {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            labels: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Load a data dictionary file
pub fn load_field_labels(path: &Path, config: &LoaderConfig) -> Result<FieldLabels> {
    let start = Instant::now();
    log_transfer_start(Transfer::Read, "data dictionary", path);

    let file = safe_open_file(path, "loading the data dictionary")?;
    let labels = read_field_labels(file, config)?;

    log_transfer_complete(Transfer::Read, path, labels.len(), start.elapsed());
    Ok(labels)
}

/// Read a data dictionary from any seekable source
///
/// Rows with a blank code or description are skipped; a repeated code keeps
/// its last description.
///
/// # Errors
/// Returns a `FormatError` if the source has fewer than two columns or a
/// malformed row.
pub fn read_field_labels<R: Read + Seek>(
    mut reader: R,
    config: &LoaderConfig,
) -> Result<FieldLabels> {
    let format = Format::default()
        .with_header(true)
        .with_delimiter(config.delimiter);

    let (inferred, _) = format
        .infer_schema(&mut reader, Some(0))
        .map_err(|e| AnalysisError::format(format!("Failed to read dictionary header: {e}")))?;
    reader.rewind()?;

    let width = inferred.fields().len();
    if width < 2 {
        return Err(AnalysisError::format(
            "Data dictionary needs a code column and a description column",
        ));
    }

    // Positional names, so unnamed or repeated headers still load
    let schema = Arc::new(Schema::new(
        (0..width)
            .map(|i| Field::new(format!("column_{i}"), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    let csv_reader = ReaderBuilder::new(schema)
        .with_header(true)
        .with_delimiter(config.delimiter)
        .with_batch_size(config.batch_size.max(1))
        .build(reader)?;

    let mut labels = FxHashMap::default();
    for batch in csv_reader {
        let batch =
            batch.map_err(|e| AnalysisError::format(format!("Malformed dictionary row: {e}")))?;
        let codes = text_values(batch.column(0))?;
        let descriptions = text_values(batch.column(1))?;

        for (code, description) in codes.into_iter().zip(descriptions) {
            if let (Some(code), Some(description)) = (code, description) {
                if !is_blank(&code) && !is_blank(&description) {
                    labels.insert(code.trim().to_string(), description.trim().to_string());
                }
            }
        }
    }

    Ok(FieldLabels { labels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(text: &str) -> Result<FieldLabels> {
        read_field_labels(Cursor::new(text.to_string()), &LoaderConfig::default())
    }

    #[test]
    fn test_read_dictionary_with_unnamed_index() {
        let labels = read(
            ",Description\nx1,\"Meal, Inexpensive Restaurant (USD)\"\nx54,Average Monthly Net Salary (After Tax) (USD)\n",
        )
        .unwrap();

        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get("x1"), Some("Meal, Inexpensive Restaurant (USD)"));
        assert_eq!(
            labels.display("x54"),
            "Average Monthly Net Salary (After Tax) (USD)"
        );
        assert_eq!(labels.display("x48"), "x48");
    }

    #[test]
    fn test_blank_rows_skipped() {
        let labels = read("Column,Description\nx1,\n,orphan\nx2,Meal for 2\n").unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels.get("x2"), Some("Meal for 2"));
    }

    #[test]
    fn test_single_column_is_format_error() {
        assert!(matches!(read("code\nx1\n"), Err(AnalysisError::Format(_))));
        assert!(matches!(read(""), Err(AnalysisError::Format(_))));
    }

    #[test]
    fn test_subset_orders_by_field() {
        let labels: FieldLabels = [("x54", "Salary"), ("x1", "Meal")].into_iter().collect();
        let subset = labels.subset(["x54", "x48", "x1"]);
        let keys: Vec<_> = subset.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["x1", "x54"]);
    }
}
