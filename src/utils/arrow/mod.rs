//! Arrow data handling utilities
//!
//! Helpers for type checks and cell extraction on Arrow arrays.

pub mod array_utils;

pub use array_utils::{
    is_blank, is_numeric_type, is_text_type, numeric_values, parse_numeric, text_values,
    to_float64,
};
