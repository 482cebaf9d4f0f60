//! Test utilities
//!
//! In-memory CSV fixtures shared by unit and integration tests.


// Re-export commonly used functions for convenience
pub use fixtures::{cost_table_csv, read_fixture, two_city_csv, write_fixture};
