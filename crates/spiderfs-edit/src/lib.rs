#![allow(clippy::doc_markdown)]

//! spiderfs-edit - Crash-safe file mutation for SpiderFS
//!
//! Atomic line-edit batches and bounded string replacement with sibling
//! backups, no-op detection, and temp-file-and-rename writes.
//!
//! # Features
//!
//! - **Line edits**: Batches applied bottom-up as one atomic transaction
//! - **String replacement**: Bounded substitution with change accounting
//! - **Backups**: Verbatim `<path>.bak` copy before every real mutation
//! - **No-op detection**: Byte-compare before writing; unnecessary backups
//!   are removed again
//! - **Diff Preview**: Unified diff of every applied change
//!
//! # Architecture
//!
//! ```text
//! spiderfs-edit/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # WriteError enum (thiserror)
//! ├── types.rs    # LineEdit, WriteResult
//! ├── diff.rs     # Unified diff + changed-line accounting
//! ├── backup.rs   # Sibling backup copies
//! └── writer.rs   # FileWriter: the mutation pipeline
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use spiderfs_edit::{FileWriter, LineEdit};
//!
//! let writer = FileWriter::default();
//! let result = writer.apply_line_edits(
//!     "notes.txt",
//!     &[LineEdit::new(2, 3, "replacement\n")],
//!     None,
//! )?;
//! println!("changed {} lines", result.changed_lines);
//! ```

mod backup;
mod diff;
mod error;
mod types;
mod writer;

pub use backup::create_backup;
pub use diff::{count_changed_lines, unified_diff};
pub use error::WriteError;
pub use types::{LineEdit, WriteResult};
pub use writer::FileWriter;
