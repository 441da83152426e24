//! Error types for partial file read operations.
//!
//! Library crates use `thiserror` for explicit error enums.

use thiserror::Error;

/// Error types for file read and streaming operations.
///
/// Each variant represents a specific failure mode in the read pipeline.
/// Expected conditions (missing file, bad range) are variants here, never
/// panics; EOF clipping on reads is not an error at all.
#[derive(Error, Debug)]
pub enum FileError {
    /// File does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// Path exists but is not a regular file.
    #[error("Not a file: {0}")]
    NotAFile(String),

    /// Line range failed validation before the file was touched.
    #[error("Invalid line range: {0}")]
    InvalidRange(String),

    /// Encoding label not recognized by the resolver.
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// Strict decode failed for the attempted encoding.
    #[error("Encoding error: {encoding} is not compatible with this file")]
    Encoding {
        /// Canonical name of the encoding that was attempted.
        encoding: &'static str,
    },

    /// Low-level I/O error from std::io.
    #[error("IO error: {0}")]
    System(#[from] std::io::Error),
}
