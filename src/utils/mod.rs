//! Utility modules shared across the pipeline stages
//!
//! - `arrow`: cell extraction and type checks on Arrow arrays
//! - `logging`: standardized operation logging and console tables
//! - `test`: CSV fixtures for tests

pub mod arrow;
pub mod logging;
pub mod test;
