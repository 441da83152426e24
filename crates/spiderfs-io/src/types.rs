//! Value types crossing the engine boundary.
//!
//! All of these are plain owned values: constructed per request, returned to
//! the caller, never retained by the engine.

use serde::{Deserialize, Serialize};

/// An inclusive, 1-based range of lines in a text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    /// First line of the range (1-based).
    pub start: usize,
    /// Last line of the range (1-based, inclusive). Must be `>= start`.
    pub end: usize,
}

impl LineRange {
    /// Build a range without validating it; validation happens in the
    /// reader so the failure surfaces as a structured error.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of lines the range spans when fully satisfied.
    #[must_use]
    pub fn span(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }
}

/// Context-read bookkeeping attached to [`ReadResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextInfo {
    /// The line the caller asked about (1-based).
    pub target_line: usize,
    /// Requested symmetric context width; 0 means the target line alone.
    pub context_lines: usize,
}

/// Result of a range or context read.
///
/// `range` reflects what was actually satisfied: it is clipped to EOF when
/// the file is shorter than the request. A window starting past EOF yields
/// empty `content`, `lines_read == 0`, and a range degenerated to the
/// requested start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResult {
    /// The requested lines, terminators preserved verbatim as read.
    pub content: String,
    /// The range as actually satisfied.
    pub range: LineRange,
    /// Size of the file in bytes at read time.
    pub file_size: u64,
    /// Lines actually returned (may be fewer than requested near EOF).
    pub lines_read: usize,
    /// Populated by context reads only.
    pub context: Option<ContextInfo>,
}

/// Per-chunk metadata yielded by the streamer alongside each payload.
///
/// A failed stream yields exactly one sentinel instance: numeric fields
/// zeroed and `error` populated. Callers must check `error` before trusting
/// the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// 1-based chunk ordinal; 0 only on the error sentinel.
    pub chunk_number: usize,
    /// Lines (line mode) or bytes (byte mode) in this chunk.
    pub size_in_chunk: usize,
    /// Running total of lines/bytes consumed including this chunk.
    pub cumulative_size: usize,
    /// Size of the file in bytes at stream-open time.
    pub file_size: u64,
    /// Byte mode: cumulative bytes have reached the open-time file size.
    /// Line mode: EOF was observed while filling this chunk.
    pub is_last_chunk: bool,
    /// Populated only on the terminal error sentinel.
    pub error: Option<String>,
}

impl ChunkMetadata {
    /// The terminal sentinel for a failed stream: numeric fields zeroed,
    /// `error` carrying the human-readable cause.
    #[must_use]
    pub fn error_sentinel(message: String) -> Self {
        Self {
            chunk_number: 0,
            size_in_chunk: 0,
            cumulative_size: 0,
            file_size: 0,
            is_last_chunk: true,
            error: Some(message),
        }
    }
}
