//! Statistics over datasets: summaries, rankings and frequency counts.

pub mod counts;
pub mod ranking;
pub mod summary;

pub use counts::{ValueCount, top_value_counts, value_counts};
pub use ranking::{Extreme, bottom_n, rows_at_extreme, top_n};
pub use summary::{ColumnSummary, describe, describe_all, field_values, mean, mean_ratio_percent};
