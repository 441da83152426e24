//! Partial, line-addressable file reads.
//!
//! The reader never materializes more of a UTF-8 file than the skipped
//! prefix plus the requested window. Non-UTF-8 encodings decode the file
//! once and slice; strictness is the same either way.

use std::fs;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use tracing::trace;

use crate::encoding::{TextEncoding, read_bytes, resolve_encoding};
use crate::error::FileError;
use crate::types::{ContextInfo, LineRange, ReadResult};

/// Reads inclusive 1-based line ranges out of text files.
///
/// Configuration is explicit at construction; there is no process-global
/// default. One instance is freely reusable across calls.
#[derive(Debug, Clone)]
pub struct FileReader {
    default_encoding: TextEncoding,
}

impl Default for FileReader {
    fn default() -> Self {
        Self::new(TextEncoding::Utf8)
    }
}

impl FileReader {
    /// Create a reader with the given default encoding.
    #[must_use]
    pub fn new(default_encoding: TextEncoding) -> Self {
        Self { default_encoding }
    }

    /// Read an inclusive 1-based line range from a file.
    ///
    /// Emits exactly the lines whose index falls in `[start, end]` with
    /// terminators preserved verbatim, clipping silently at EOF: a file
    /// shorter than the request yields fewer lines and the true count in
    /// the result, never an error.
    ///
    /// # Errors
    /// [`FileError::NotFound`] / [`FileError::NotAFile`] for a bad path,
    /// [`FileError::InvalidRange`] when `start < 1` or `end < start`
    /// (checked before the file content is touched), and
    /// [`FileError::Encoding`] on a strict-decode failure.
    pub fn read_line_range<P: AsRef<Path>>(
        &self,
        path: P,
        range: LineRange,
        encoding: Option<TextEncoding>,
    ) -> Result<ReadResult, FileError> {
        let path = path.as_ref();

        let metadata = fs::metadata(path)
            .map_err(|_| FileError::NotFound(path.to_string_lossy().to_string()))?;
        if !metadata.is_file() {
            return Err(FileError::NotAFile(path.to_string_lossy().to_string()));
        }

        if range.start < 1 {
            return Err(FileError::InvalidRange(
                "Line numbers must be >= 1".to_string(),
            ));
        }
        if range.end < range.start {
            return Err(FileError::InvalidRange(
                "End line must be >= start line".to_string(),
            ));
        }

        let resolved = encoding.unwrap_or(self.default_encoding);
        let (content, lines_read) = match resolved {
            TextEncoding::Utf8 => read_window_buffered(path, range)?,
            other => read_window_decoded(path, range, other)?,
        };
        trace!(path = %path.display(), start = range.start, lines_read, "range read");

        Ok(ReadResult {
            content,
            range: satisfied_range(range, lines_read),
            file_size: metadata.len(),
            lines_read,
            context: None,
        })
    }

    /// Read one line together with `context_lines` of symmetric context.
    ///
    /// Computes `[max(1, n - k), n + k]` and delegates to
    /// [`Self::read_line_range`]; a width of 0 reads exactly the target
    /// line. The result carries the original target and requested width.
    ///
    /// # Errors
    /// Same failure modes as [`Self::read_line_range`].
    pub fn read_context_around_line<P: AsRef<Path>>(
        &self,
        path: P,
        line_number: usize,
        context_lines: usize,
        encoding: Option<TextEncoding>,
    ) -> Result<ReadResult, FileError> {
        let range = LineRange::new(
            line_number.saturating_sub(context_lines).max(1),
            line_number + context_lines,
        );
        let mut result = self.read_line_range(path, range, encoding)?;
        result.context = Some(ContextInfo {
            target_line: line_number,
            context_lines,
        });
        Ok(result)
    }

    /// Resolve an optional encoding label against this reader's default.
    ///
    /// # Errors
    /// [`FileError::UnsupportedEncoding`] for an unrecognized label.
    pub fn resolve_label(&self, label: Option<&str>) -> Result<TextEncoding, FileError> {
        resolve_encoding(label, self.default_encoding)
    }
}

/// The range as actually satisfied: clipped to what was read, degenerating
/// to the requested start when nothing was.
fn satisfied_range(requested: LineRange, lines_read: usize) -> LineRange {
    if lines_read == 0 {
        LineRange::new(requested.start, requested.start)
    } else {
        LineRange::new(requested.start, requested.start + lines_read - 1)
    }
}

/// Incremental UTF-8 window read: skip `start - 1` lines, collect up to
/// `span` lines, stop at EOF.
fn read_window_buffered(path: &Path, range: LineRange) -> Result<(String, usize), FileError> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();

    for _ in 0..range.start - 1 {
        line.clear();
        if read_one_line(&mut reader, &mut line)? == 0 {
            return Ok((String::new(), 0));
        }
    }

    let mut content = String::new();
    let mut lines_read = 0;
    for _ in 0..range.span() {
        line.clear();
        if read_one_line(&mut reader, &mut line)? == 0 {
            break;
        }
        content.push_str(&line);
        lines_read += 1;
    }
    Ok((content, lines_read))
}

/// `BufRead::read_line` with strict-UTF-8 failures mapped to the encoding
/// error the caller expects.
fn read_one_line(reader: &mut impl BufRead, buf: &mut String) -> Result<usize, FileError> {
    reader.read_line(buf).map_err(|e| {
        if e.kind() == ErrorKind::InvalidData {
            FileError::Encoding { encoding: "utf-8" }
        } else {
            FileError::System(e)
        }
    })
}

/// Whole-file decode for non-UTF-8 encodings, then slice the window.
fn read_window_decoded(
    path: &Path,
    range: LineRange,
    encoding: TextEncoding,
) -> Result<(String, usize), FileError> {
    let buffer = read_bytes(path)?;
    let text = encoding.decode(&buffer)?;

    let mut content = String::new();
    let mut lines_read = 0;
    for line in text
        .split_inclusive('\n')
        .skip(range.start - 1)
        .take(range.span())
    {
        content.push_str(line);
        lines_read += 1;
    }
    Ok((content, lines_read))
}
