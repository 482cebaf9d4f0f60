//! Frequency counts for categorical fields.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::dataset::Dataset;
use crate::utils::arrow::{is_blank, text_values};
use crate::error::Result;

/// Occurrences of one distinct value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Count distinct values of `field`, most frequent first
///
/// Ties are ordered by first occurrence. Missing cells are not counted.
pub fn value_counts(dataset: &Dataset, field: &str) -> Result<Vec<ValueCount>> {
    let values = text_values(dataset.column(field)?)?;

    // value -> (count, first row)
    let mut counts: FxHashMap<&str, (usize, usize)> = FxHashMap::default();
    for (row, value) in values.iter().enumerate() {
        let Some(value) = value.as_deref().filter(|v| !is_blank(v)) else {
            continue;
        };
        counts.entry(value).or_insert((0, row)).0 += 1;
    }

    let mut ordered: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(value, (count, first))| (value, count, first))
        .collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    Ok(ordered
        .into_iter()
        .map(|(value, count, _)| ValueCount {
            value: value.to_string(),
            count,
        })
        .collect())
}

/// The `limit` most frequent values of `field`
pub fn top_value_counts(dataset: &Dataset, field: &str, limit: usize) -> Result<Vec<ValueCount>> {
    let mut counts = value_counts(dataset, field)?;
    counts.truncate(limit);
    Ok(counts)
}
