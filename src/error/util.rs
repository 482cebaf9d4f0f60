//! Utility functions for error handling
//!
//! File-system helpers that attach the path and purpose to IO failures.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{AnalysisError, Result};

fn io_error(kind: io::ErrorKind, message: String) -> AnalysisError {
    AnalysisError::Io(io::Error::new(kind, message))
}

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(io_error(
            io::ErrorKind::NotFound,
            format!("File not found: {} (needed for: {purpose})", path.display()),
        ));
    }

    if !path.is_file() {
        return Err(io_error(
            io::ErrorKind::InvalidInput,
            format!("Path is not a file: {} (expected a file for: {purpose})", path.display()),
        ));
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => "Permission denied - check file permissions",
            _ => "Failed to open file",
        };
        io_error(e.kind(), format!("{context}: {} ({e})", path.display()))
    })
}

/// Check that a directory exists, with rich error information
pub fn validate_directory(path: &Path, purpose: &str) -> Result<()> {
    if !path.exists() {
        return Err(io_error(
            io::ErrorKind::NotFound,
            format!("Directory not found: {} (needed for: {purpose})", path.display()),
        ));
    }

    if !path.is_dir() {
        return Err(io_error(
            io::ErrorKind::InvalidInput,
            format!(
                "Path is not a directory: {} (expected a directory for: {purpose})",
                path.display()
            ),
        ));
    }

    Ok(())
}
