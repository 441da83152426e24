//! Error types for file mutation operations.
//!
//! Library crates use `thiserror` for explicit error enums.

use spiderfs_io::FileError;
use thiserror::Error;

/// Error types for the mutation pipeline.
///
/// Every validation failure is a distinct variant; callers must treat any
/// write call as potentially failed. The engine never retries on its own.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Read-side failure (missing file, decode error, raw I/O).
    #[error("IO error: {0}")]
    Io(#[from] FileError),

    /// An edit's `line_start` was below 1.
    #[error("Invalid line number: {0}. Line numbers must be >= 1")]
    InvalidLineNumber(usize),

    /// An edit's `line_end` was below its `line_start`.
    #[error("Invalid line range: {start}-{end}. End must be >= start")]
    InvalidLineRange {
        /// The edit's starting line.
        start: usize,
        /// The edit's ending line.
        end: usize,
    },

    /// An edit started past the end of the file.
    #[error("Line start {start} is beyond the end of file ({total} lines)")]
    LineBeyondEof {
        /// The edit's starting line.
        start: usize,
        /// Total lines in the file at validation time.
        total: usize,
    },

    /// Backup creation failed; the mutation was aborted before any write.
    #[error("Error creating backup for {path}: {source}")]
    Backup {
        /// The file that was being backed up.
        path: String,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// Write-side I/O failure (temp file, atomic rename).
    #[error("IO error: {0}")]
    System(#[from] std::io::Error),
}
