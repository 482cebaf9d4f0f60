//! Row rankings by a numeric field.
//!
//! Rankings sort stably, so rows with equal values keep their original
//! relative order. Rows missing the ranking value are left out.

use std::cmp::Ordering;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::utils::arrow::numeric_values;

/// Which end of a field's range to select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Min,
    Max,
}

/// Row positions of present values, stably sorted by value
fn ranked_indices(values: &[Option<f64>], descending: bool) -> Vec<usize> {
    let mut ranked: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(row, v)| v.map(|v| (row, v)))
        .collect();

    ranked.sort_by(|a, b| {
        let ord = a.1.total_cmp(&b.1);
        if descending { ord.reverse() } else { ord }
    });

    ranked.into_iter().map(|(row, _)| row).collect()
}

fn ranked(dataset: &Dataset, field: &str, n: usize, descending: bool) -> Result<Dataset> {
    let values = numeric_values(dataset.column(field)?, field)?;
    let mut indices = ranked_indices(&values, descending);
    indices.truncate(n);
    dataset.take(&indices)
}

/// The `n` rows with the largest values of `field`, largest first
pub fn top_n(dataset: &Dataset, field: &str, n: usize) -> Result<Dataset> {
    ranked(dataset, field, n, true)
}

/// The `n` rows with the smallest values of `field`, smallest first
pub fn bottom_n(dataset: &Dataset, field: &str, n: usize) -> Result<Dataset> {
    ranked(dataset, field, n, false)
}

/// Every row holding the minimum or maximum value of `field`, in row order
pub fn rows_at_extreme(dataset: &Dataset, field: &str, extreme: Extreme) -> Result<Dataset> {
    let values = numeric_values(dataset.column(field)?, field)?;

    let target = values.iter().flatten().copied().reduce(|acc, v| {
        let keep_acc = match extreme {
            Extreme::Min => acc.total_cmp(&v) != Ordering::Greater,
            Extreme::Max => acc.total_cmp(&v) != Ordering::Less,
        };
        if keep_acc { acc } else { v }
    });

    let rows: Vec<usize> = match target {
        Some(target) => values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == Some(target))
            .map(|(row, _)| row)
            .collect(),
        None => Vec::new(),
    };

    dataset.take(&rows)
}
