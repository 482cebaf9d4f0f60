//! Stage logging for file reads and writes.

use std::path::Path;
use std::time::Duration;

/// Direction of a file transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    Read,
    Write,
}

impl Transfer {
    fn progressive(self) -> &'static str {
        match self {
            Self::Read => "Reading",
            Self::Write => "Writing",
        }
    }

    fn past(self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Write => "Wrote",
        }
    }

    fn preposition(self) -> &'static str {
        match self {
            Self::Read => "from",
            Self::Write => "to",
        }
    }
}

/// Message logged once a transfer of `rows` rows has finished
#[must_use]
pub fn transfer_summary(
    transfer: Transfer,
    path: &Path,
    rows: usize,
    elapsed: Duration,
) -> String {
    format!(
        "{} {rows} rows {} {} in {elapsed:?}",
        transfer.past(),
        transfer.preposition(),
        path.display()
    )
}

/// Log the start of a read or write of `what` at `path`
pub fn log_transfer_start(transfer: Transfer, what: &str, path: &Path) {
    log::info!("{} {what} {}", transfer.progressive(), path.display());
}

/// Log a finished read or write
pub fn log_transfer_complete(transfer: Transfer, path: &Path, rows: usize, elapsed: Duration) {
    log::info!("{}", transfer_summary(transfer, path, rows, elapsed));
}
