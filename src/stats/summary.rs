//! Descriptive statistics for numeric fields.

use rayon::prelude::*;
use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::utils::arrow::numeric_values;

/// Summary of one numeric field, in the layout of a `describe` table
///
/// A field with no values has `count == 0` and every statistic `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub field: String,
    /// Number of non-missing values
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1 divisor); `None` below two values
    pub std: Option<f64>,
    pub min: Option<f64>,
    /// 25% quantile
    pub q1: Option<f64>,
    /// 50% quantile
    pub median: Option<f64>,
    /// 75% quantile
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

/// Present values of a numeric field
pub fn field_values(dataset: &Dataset, field: &str) -> Result<Vec<f64>> {
    let column = dataset.column(field)?;
    Ok(numeric_values(column, field)?.into_iter().flatten().collect())
}

/// Quantile of ascending values with linear interpolation between neighbours
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn summarize(field: &str, mut values: Vec<f64>) -> ColumnSummary {
    values.sort_by(f64::total_cmp);

    // Welford's running mean and squared deviations
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for (k, x) in values.iter().enumerate() {
        let delta = x - mean;
        mean += delta / (k + 1) as f64;
        m2 += delta * (x - mean);
    }

    let count = values.len();
    let min = values.first().copied();
    let max = values.last().copied();

    ColumnSummary {
        field: field.to_string(),
        count,
        mean: min.zip(max).map(|(lo, hi)| mean.clamp(lo, hi)),
        std: (count > 1).then(|| (m2 / (count - 1) as f64).sqrt()),
        min,
        q1: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q3: quantile(&values, 0.75),
        max,
    }
}

/// Describe one numeric field
///
/// Missing values are skipped. A field with no values yields a summary with
/// `count == 0`.
///
/// # Errors
/// Returns a `FieldError` if the field is absent or non-numeric.
pub fn describe(dataset: &Dataset, field: &str) -> Result<ColumnSummary> {
    Ok(summarize(field, field_values(dataset, field)?))
}

/// Describe every non-identifier field that has values, in schema order
///
/// Fields are summarised in parallel; the result does not depend on the
/// thread count.
pub fn describe_all<S: AsRef<str> + Sync>(
    dataset: &Dataset,
    identifiers: &[S],
) -> Result<Vec<ColumnSummary>> {
    let fields: Vec<String> = dataset
        .field_names()
        .into_iter()
        .filter(|name| !identifiers.iter().any(|id| id.as_ref() == name))
        .collect();

    let summaries = fields
        .par_iter()
        .map(|field| describe(dataset, field))
        .collect::<Result<Vec<ColumnSummary>>>()?;

    Ok(summaries
        .into_iter()
        .filter(|summary| {
            if summary.count == 0 {
                log::warn!("Field '{}' has no values; skipped in summary", summary.field);
            }
            summary.count > 0
        })
        .collect())
}

/// Mean of a numeric field, `None` when it has no values
pub fn mean(dataset: &Dataset, field: &str) -> Result<Option<f64>> {
    Ok(describe(dataset, field)?.mean)
}

/// Mean of `part` as a percentage of the mean of `whole`
///
/// `None` when either field has no values or the mean of `whole` is zero.
pub fn mean_ratio_percent(dataset: &Dataset, part: &str, whole: &str) -> Result<Option<f64>> {
    let whole_mean = mean(dataset, whole)?.filter(|m| *m != 0.0);
    let part_mean = mean(dataset, part)?;
    Ok(part_mean
        .zip(whole_mean)
        .map(|(part, whole)| part / whole * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderConfig;
    use crate::error::AnalysisError;
    use crate::loader::read_csv;
    use std::io::Cursor;

    fn read(text: &str) -> Dataset {
        read_csv(Cursor::new(text.to_string()), &LoaderConfig::default()).unwrap()
    }

    #[test]
    fn test_describe_quartiles() {
        let ds = read("v\n4\n1\n3\n2\n");
        let s = describe(&ds, "v").unwrap();
        assert_eq!(s.count, 4);
        assert!((s.mean.unwrap() - 2.5).abs() < 1e-12);
        assert!((s.q1.unwrap() - 1.75).abs() < 1e-12);
        assert!((s.median.unwrap() - 2.5).abs() < 1e-12);
        assert!((s.q3.unwrap() - 3.25).abs() < 1e-12);
        assert_eq!(s.min, Some(1.0));
        assert_eq!(s.max, Some(4.0));
        // sample std of 1..4 = sqrt(5/3)
        assert!((s.std.unwrap() - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_single_value_has_no_std() {
        let ds = read("v\n7\n");
        let s = describe(&ds, "v").unwrap();
        assert_eq!(s.std, None);
        assert_eq!(s.median, Some(7.0));
    }

    #[test]
    fn test_constant_values_mean_within_bounds() {
        let ds = read("v\n0.1\n0.1\n0.1\n");
        let s = describe(&ds, "v").unwrap();
        let mean = s.mean.unwrap();
        assert!(s.min.unwrap() <= mean && mean <= s.max.unwrap());
    }

    #[test]
    fn test_missing_values_skipped() {
        let ds = read("v\n1\n\n3\n");
        assert_eq!(describe(&ds, "v").unwrap().count, 2);
    }

    #[test]
    fn test_field_without_values_has_empty_summary() {
        let ds = read("v,w\n,1\n");
        let s = describe(&ds, "v").unwrap();
        assert_eq!(s.count, 0);
        assert_eq!((s.mean, s.std, s.min, s.median, s.max), (None, None, None, None, None));

        let header_only = read("v\n");
        assert_eq!(describe(&header_only, "v").unwrap().count, 0);
        assert_eq!(mean(&header_only, "v").unwrap(), None);
    }

    #[test]
    fn test_absent_or_text_field_is_error() {
        let ds = read("city,v\nA,N/A\n");
        assert!(matches!(describe(&ds, "nope"), Err(AnalysisError::Field(_))));
        assert!(matches!(describe(&ds, "v"), Err(AnalysisError::Field(_))));
    }

    #[test]
    fn test_quantile_of_nothing() {
        assert_eq!(quantile(&[], 0.5), None);
        assert_eq!(quantile(&[2.0, 4.0], 0.5), Some(3.0));
    }

    #[test]
    fn test_describe_all_skips_identifiers_and_empty_fields() {
        let ds = read("city,a,b,c\nX,1,2,\nY,3,4,\n");
        let all = describe_all(&ds, &["city"]).unwrap();
        let names: Vec<_> = all.iter().map(|s| s.field.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_mean_ratio_percent() {
        let ds = read("rent,salary,zero\n40,100,0\n60,100,0\n");
        let pct = mean_ratio_percent(&ds, "rent", "salary").unwrap().unwrap();
        assert!((pct - 50.0).abs() < 1e-12);
        assert_eq!(mean_ratio_percent(&ds, "rent", "zero").unwrap(), None);
    }
}
