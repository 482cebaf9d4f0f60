//! Logging utilities for output
//!
//! This module provides utilities for logging file reads and writes and rendering
//! small tables for console output.

pub mod console;
pub mod log;

// Re-export commonly used functions for convenience
pub use console::{format_preview, format_report_line};
pub use log::{Transfer, log_transfer_complete, log_transfer_start, transfer_summary};
