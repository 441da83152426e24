#![allow(clippy::doc_markdown)]

//! spiderfs-io - Partial, line-addressable file reads for SpiderFS
//!
//! Line-range and context reads plus chunked streaming, with strict
//! encoding resolution shared by every operation.
//!
//! # Features
//!
//! - **Range reads**: Inclusive 1-based windows, clipped silently at EOF
//! - **Context reads**: One line with symmetric surrounding context
//! - **Chunked streaming**: Pull-based line or byte chunks with metadata
//! - **Strict encodings**: Explicit resolution, opt-in detection, no guessing
//!
//! # Architecture
//!
//! ```text
//! spiderfs-io/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # FileError enum (thiserror)
//! ├── types.rs    # LineRange, ReadResult, ChunkMetadata
//! ├── encoding.rs # Encoding resolution, detection, transcoding
//! ├── reader.rs   # FileReader: range and context reads
//! └── streamer.rs # FileStreamer: line and byte chunk iterators
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use spiderfs_io::{FileReader, LineRange};
//!
//! let reader = FileReader::default();
//! let result = reader.read_line_range("src/main.rs", LineRange::new(10, 20), None)?;
//! println!("{}", result.content);
//! ```

mod encoding;
mod error;
mod reader;
mod streamer;
mod types;

pub use encoding::{TextEncoding, detect_encoding, is_binary, read_text, resolve_encoding};
pub use error::FileError;
pub use reader::FileReader;
pub use streamer::{
    ByteChunks, DEFAULT_BYTE_CHUNK_SIZE, DEFAULT_LINE_CHUNK_SIZE, FileStreamer, LineChunks,
};
pub use types::{ChunkMetadata, ContextInfo, LineRange, ReadResult};
