//! Chunked, pull-based file streaming.
//!
//! Both modes are one-shot pull iterators: the caller controls pacing, and
//! dropping the iterator abandons the stream without holding any handle
//! open. UTF-8 line streams and byte streams read incrementally per pull;
//! other encodings decode the whole file once at open, since a strict
//! non-UTF-8 decode cannot be done piecemeal. Failures never surface as
//! `Err` — each stream yields exactly
//! one sentinel chunk carrying an error message, then exhausts. Chunks
//! yielded before a mid-stream failure remain valid.

use std::collections::VecDeque;
use std::fs;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use tracing::trace;

use crate::encoding::{TextEncoding, read_bytes};
use crate::error::FileError;
use crate::types::ChunkMetadata;

/// Default number of lines per chunk in line mode.
pub const DEFAULT_LINE_CHUNK_SIZE: usize = 1000;
/// Default number of bytes per chunk in byte mode.
pub const DEFAULT_BYTE_CHUNK_SIZE: usize = 8192;

/// Streams file contents in bounded chunks of lines or bytes.
#[derive(Debug, Clone)]
pub struct FileStreamer {
    chunk_size: usize,
    byte_chunk_size: usize,
    default_encoding: TextEncoding,
}

impl Default for FileStreamer {
    fn default() -> Self {
        Self::new(
            DEFAULT_LINE_CHUNK_SIZE,
            DEFAULT_BYTE_CHUNK_SIZE,
            TextEncoding::Utf8,
        )
    }
}

impl FileStreamer {
    /// Create a streamer with explicit chunk sizes and default encoding.
    ///
    /// Chunk sizes of 0 are clamped to 1.
    #[must_use]
    pub fn new(chunk_size: usize, byte_chunk_size: usize, default_encoding: TextEncoding) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            byte_chunk_size: byte_chunk_size.max(1),
            default_encoding,
        }
    }

    /// Stream a file's text in chunks of up to `chunk_size` lines.
    ///
    /// Terminators are preserved verbatim; the stream never yields a
    /// trailing empty chunk. A bad path or decode failure yields one error
    /// sentinel and nothing else.
    pub fn stream_lines<P: AsRef<Path>>(
        &self,
        path: P,
        encoding: Option<TextEncoding>,
    ) -> LineChunks {
        let path = path.as_ref();
        let resolved = encoding.unwrap_or(self.default_encoding);

        let (state, file_size) = match open_checked(path) {
            Err(message) => (StreamState::Failed(message), 0),
            Ok(metadata) => {
                let source = match resolved {
                    TextEncoding::Utf8 => fs::File::open(path)
                        .map(|file| LineSource::Buffered(BufReader::new(file)))
                        .map_err(|e| format!("Error streaming file: {e}")),
                    other => read_bytes(path)
                        .map_err(|e| e.to_string())
                        .and_then(|buffer| {
                            other.decode(&buffer).map_err(|e| e.to_string()).map(|text| {
                                LineSource::Decoded(
                                    text.split_inclusive('\n').map(String::from).collect(),
                                )
                            })
                        }),
                };
                match source {
                    Ok(source) => (StreamState::Active(source), metadata.len()),
                    Err(message) => (StreamState::Failed(message), 0),
                }
            }
        };
        trace!(path = %path.display(), chunk_size = self.chunk_size, "line stream opened");

        LineChunks {
            state,
            chunk_size: self.chunk_size,
            file_size,
            chunk_number: 0,
            cumulative_lines: 0,
        }
    }

    /// Stream a file's raw bytes in chunks of up to `byte_chunk_size`.
    ///
    /// Performs no decoding at all; suitable for binary files. The last
    /// chunk is flagged when cumulative bytes reach the file size captured
    /// at open time.
    pub fn stream_bytes<P: AsRef<Path>>(&self, path: P) -> ByteChunks {
        let path = path.as_ref();
        let (state, file_size) = match open_checked(path) {
            Err(message) => (StreamState::Failed(message), 0),
            Ok(metadata) => match fs::File::open(path) {
                Ok(file) => (StreamState::Active(file), metadata.len()),
                Err(e) => (StreamState::Failed(format!("Error streaming file: {e}")), 0),
            },
        };
        trace!(path = %path.display(), chunk_size = self.byte_chunk_size, "byte stream opened");

        ByteChunks {
            state,
            byte_chunk_size: self.byte_chunk_size,
            file_size,
            chunk_number: 0,
            cumulative_bytes: 0,
        }
    }
}

/// Exists / regular-file validation shared by both stream modes, reported
/// in the original's sentinel wording.
fn open_checked(path: &Path) -> Result<fs::Metadata, String> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => Ok(metadata),
        _ => Err(format!(
            "File not found or not a regular file: {}",
            path.display()
        )),
    }
}

/// Three-state cursor shared by both iterators: still producing, holding a
/// pending error sentinel, or exhausted.
enum StreamState<S> {
    Active(S),
    Failed(String),
    Done,
}

/// Where line mode pulls its lines from: incrementally for UTF-8, from a
/// one-time decode for everything else.
enum LineSource {
    Buffered(BufReader<fs::File>),
    Decoded(VecDeque<String>),
}

/// One-shot iterator over `(text_chunk, metadata)` pairs.
pub struct LineChunks {
    state: StreamState<LineSource>,
    chunk_size: usize,
    file_size: u64,
    chunk_number: usize,
    cumulative_lines: usize,
}

impl Iterator for LineChunks {
    type Item = (String, ChunkMetadata);

    fn next(&mut self) -> Option<Self::Item> {
        match std::mem::replace(&mut self.state, StreamState::Done) {
            StreamState::Done => None,
            StreamState::Failed(message) => {
                Some((String::new(), ChunkMetadata::error_sentinel(message)))
            }
            StreamState::Active(mut source) => {
                let mut content = String::new();
                let mut lines_in_chunk = 0;
                let mut saw_eof = false;

                for _ in 0..self.chunk_size {
                    match pull_line(&mut source) {
                        Err(message) => {
                            // Mid-stream failure: prior chunks stand, this
                            // stream ends on the sentinel.
                            return Some((String::new(), ChunkMetadata::error_sentinel(message)));
                        }
                        Ok(None) => {
                            saw_eof = true;
                            break;
                        }
                        Ok(Some(line)) => {
                            content.push_str(&line);
                            lines_in_chunk += 1;
                        }
                    }
                }

                if lines_in_chunk == 0 {
                    return None;
                }
                if !saw_eof {
                    self.state = StreamState::Active(source);
                }

                self.chunk_number += 1;
                self.cumulative_lines += lines_in_chunk;
                let metadata = ChunkMetadata {
                    chunk_number: self.chunk_number,
                    size_in_chunk: lines_in_chunk,
                    cumulative_size: self.cumulative_lines,
                    file_size: self.file_size,
                    is_last_chunk: saw_eof,
                    error: None,
                };
                Some((content, metadata))
            }
        }
    }
}

/// Pull one terminator-preserving line, `None` at EOF.
fn pull_line(source: &mut LineSource) -> Result<Option<String>, String> {
    match source {
        LineSource::Decoded(lines) => Ok(lines.pop_front()),
        LineSource::Buffered(reader) => {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => Ok(None),
                Ok(_) => Ok(Some(line)),
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    Err(FileError::Encoding { encoding: "utf-8" }.to_string())
                }
                Err(e) => Err(format!("Error streaming file: {e}")),
            }
        }
    }
}

/// One-shot iterator over `(byte_chunk, metadata)` pairs.
pub struct ByteChunks {
    state: StreamState<fs::File>,
    byte_chunk_size: usize,
    file_size: u64,
    chunk_number: usize,
    cumulative_bytes: usize,
}

impl Iterator for ByteChunks {
    type Item = (Vec<u8>, ChunkMetadata);

    fn next(&mut self) -> Option<Self::Item> {
        match std::mem::replace(&mut self.state, StreamState::Done) {
            StreamState::Done => None,
            StreamState::Failed(message) => {
                Some((Vec::new(), ChunkMetadata::error_sentinel(message)))
            }
            StreamState::Active(mut file) => {
                let mut chunk = vec![0_u8; self.byte_chunk_size];
                let mut filled = 0;
                while filled < chunk.len() {
                    match file.read(&mut chunk[filled..]) {
                        Ok(0) => break,
                        Ok(n) => filled += n,
                        Err(e) if e.kind() == ErrorKind::Interrupted => {}
                        Err(e) => {
                            return Some((
                                Vec::new(),
                                ChunkMetadata::error_sentinel(format!(
                                    "Error streaming file: {e}"
                                )),
                            ));
                        }
                    }
                }

                if filled == 0 {
                    return None;
                }
                chunk.truncate(filled);

                self.chunk_number += 1;
                self.cumulative_bytes += filled;
                let is_last_chunk = self.cumulative_bytes as u64 >= self.file_size;
                if !is_last_chunk {
                    self.state = StreamState::Active(file);
                }

                let metadata = ChunkMetadata {
                    chunk_number: self.chunk_number,
                    size_in_chunk: filled,
                    cumulative_size: self.cumulative_bytes,
                    file_size: self.file_size,
                    is_last_chunk,
                    error: None,
                };
                Some((chunk, metadata))
            }
        }
    }
}
