//! Row filtering for datasets
//!
//! Mask-based selection over Arrow record batches, the quality-flag splitter
//! and the incomplete-row filter.

pub mod core;
pub mod nulls;
pub mod quality;

pub use core::{BatchFilter, filter_record_batch};
pub use nulls::{CompleteRowFilter, NullFilterOutcome, drop_incomplete_rows};
pub use quality::{Quality, QualityFilter, QualityPartition, quality_flags, split_by_quality};
