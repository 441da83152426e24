//! Crash-safe line edits and string replacement.
//!
//! Both entry points share one write discipline: validate, back up, read
//! the whole file, compute the new content in memory, compare it against
//! the original, then replace the file through a temp-file-and-atomic-rename
//! so readers never observe a partially written state.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use spiderfs_io::{FileError, TextEncoding, read_text};

use crate::backup::{create_backup, remove_backup};
use crate::diff::{count_changed_lines, unified_diff};
use crate::error::WriteError;
use crate::types::{LineEdit, WriteResult};

/// Applies atomic batches of line edits and bounded string substitution.
///
/// One call is one transaction against one file. The engine assumes it is
/// the only mutator of the path for the duration of the call; concurrent
/// external writers are an unguarded race.
#[derive(Debug, Clone)]
pub struct FileWriter {
    create_backup: bool,
    default_encoding: TextEncoding,
}

impl Default for FileWriter {
    fn default() -> Self {
        Self::new(true, TextEncoding::Utf8)
    }
}

impl FileWriter {
    /// Create a writer with an explicit backup toggle and default encoding.
    #[must_use]
    pub fn new(create_backup: bool, default_encoding: TextEncoding) -> Self {
        Self {
            create_backup,
            default_encoding,
        }
    }

    /// Apply a batch of line edits as one atomic transaction.
    ///
    /// Edits are applied bottom-up (sorted by `line_start` descending) so an
    /// applied edit never shifts the numbering a later edit was expressed
    /// against. The whole batch is validated against the original file state
    /// before anything is applied. `changed_lines` sums the original lines
    /// spanned by each edit whose replacement differs from what it replaced,
    /// not the line count of the replacement text.
    ///
    /// A computed result byte-identical to the original is a verified no-op:
    /// nothing is written and the just-created backup is removed again.
    ///
    /// Overlapping ranges within one batch are not rejected; they are
    /// applied in descending-start order and can interact. A validation
    /// failure after the backup was created leaves the backup in place.
    ///
    /// # Errors
    /// [`WriteError::InvalidLineNumber`], [`WriteError::InvalidLineRange`],
    /// [`WriteError::LineBeyondEof`] from batch validation;
    /// [`WriteError::Backup`] aborts before any read;
    /// [`WriteError::Io`] / [`WriteError::System`] for decode and I/O
    /// failures. On any error the destination file is untouched.
    pub fn apply_line_edits<P: AsRef<Path>>(
        &self,
        path: P,
        edits: &[LineEdit],
        encoding: Option<TextEncoding>,
    ) -> Result<WriteResult, WriteError> {
        let path = path.as_ref();
        validate_target(path)?;

        let backup_path = self.take_backup(path)?;
        let resolved = encoding.unwrap_or(self.default_encoding);
        let original = read_text(path, resolved)?;

        let mut lines: Vec<String> = original.split_inclusive('\n').map(String::from).collect();
        let total_lines = lines.len();

        // Bottom-up application order.
        let mut sorted: Vec<&LineEdit> = edits.iter().collect();
        sorted.sort_by(|a, b| b.line_start.cmp(&a.line_start));

        // The whole batch is validated against the original file state
        // before any edit is folded in.
        for edit in &sorted {
            if edit.line_start < 1 {
                return Err(WriteError::InvalidLineNumber(edit.line_start));
            }
            if edit.line_end < edit.line_start {
                return Err(WriteError::InvalidLineRange {
                    start: edit.line_start,
                    end: edit.line_end,
                });
            }
            if edit.line_start > total_lines {
                return Err(WriteError::LineBeyondEof {
                    start: edit.line_start,
                    total: total_lines,
                });
            }
        }

        let mut changed_lines = 0;
        for edit in &sorted {
            // Clamp to the current line count: an earlier edit in the batch
            // may have shortened the file below the original total.
            let start = (edit.line_start - 1).min(lines.len());
            let end = edit.line_end.min(total_lines).clamp(start, lines.len());

            let new_lines = split_replacement(&edit.new_content);
            if lines[start..end] != new_lines[..] {
                changed_lines += end - start;
            }
            lines.splice(start..end, new_lines);
        }

        let modified = lines.concat();
        if modified == original {
            debug!(path = %path.display(), "line edits were a no-op");
            if let Some(backup) = &backup_path {
                remove_backup(backup);
            }
            return Ok(WriteResult::unchanged());
        }

        write_atomic(path, &resolved.encode(&modified)?)?;
        debug!(path = %path.display(), changed_lines, "line edits applied");

        Ok(WriteResult {
            changed_lines,
            backup_path,
            unchanged: false,
            replacements: 0,
            diff: unified_diff(&original, &modified),
        })
    }

    /// Replace occurrences of `old_string` with `new_string` in a file.
    ///
    /// `max_replacements > 0` bounds the substitution; 0 means unbounded.
    /// An absent `old_string` is a verified no-op: nothing is written, the
    /// backup is removed, and the file is byte-identical afterward. So is a
    /// substitution whose result equals the original (e.g. `old == new`).
    ///
    /// `changed_lines` is a positional line diff of old vs. new content -
    /// an approximation, not a minimal edit distance. `replacements` carries
    /// the substitution count actually performed.
    ///
    /// `old_string` is expected to be non-empty (the calling boundary
    /// validates this); an empty pattern is treated as a no-op rather than
    /// inserting `new_string` between every character.
    ///
    /// # Errors
    /// [`WriteError::Backup`], [`WriteError::Io`], [`WriteError::System`];
    /// on any error the destination file is untouched.
    pub fn replace_string<P: AsRef<Path>>(
        &self,
        path: P,
        old_string: &str,
        new_string: &str,
        max_replacements: usize,
        encoding: Option<TextEncoding>,
    ) -> Result<WriteResult, WriteError> {
        let path = path.as_ref();
        validate_target(path)?;

        let backup_path = self.take_backup(path)?;
        let resolved = encoding.unwrap_or(self.default_encoding);
        let original = read_text(path, resolved)?;

        if old_string.is_empty() || !original.contains(old_string) {
            debug!(path = %path.display(), "string replacement was a no-op");
            if let Some(backup) = &backup_path {
                remove_backup(backup);
            }
            return Ok(WriteResult::unchanged());
        }

        let occurrences = original.matches(old_string).count();
        let (modified, replacements) = if max_replacements > 0 {
            (
                original.replacen(old_string, new_string, max_replacements),
                occurrences.min(max_replacements),
            )
        } else {
            (original.replace(old_string, new_string), occurrences)
        };

        // Replacement text can equal the matched text byte-for-byte.
        if modified == original {
            debug!(path = %path.display(), "string replacement changed nothing");
            if let Some(backup) = &backup_path {
                remove_backup(backup);
            }
            return Ok(WriteResult::unchanged());
        }

        write_atomic(path, &resolved.encode(&modified)?)?;
        let changed_lines = count_changed_lines(&original, &modified);
        debug!(path = %path.display(), replacements, changed_lines, "string replaced");

        Ok(WriteResult {
            changed_lines,
            backup_path,
            unchanged: false,
            replacements,
            diff: unified_diff(&original, &modified),
        })
    }

    fn take_backup(&self, path: &Path) -> Result<Option<PathBuf>, WriteError> {
        if self.create_backup {
            Ok(Some(create_backup(path)?))
        } else {
            Ok(None)
        }
    }
}

/// Exists / regular-file validation shared by both entry points.
fn validate_target(path: &Path) -> Result<(), WriteError> {
    let metadata = fs::metadata(path)
        .map_err(|_| FileError::NotFound(path.to_string_lossy().to_string()))?;
    if metadata.is_file() {
        Ok(())
    } else {
        Err(FileError::NotAFile(path.to_string_lossy().to_string()).into())
    }
}

/// Split replacement text into terminator-preserving lines.
///
/// With inclusive splitting only the final piece can lack a terminator, so
/// every non-final replacement line ends in one, as the slice it replaces
/// did. Empty content yields no lines and deletes the slice.
fn split_replacement(new_content: &str) -> Vec<String> {
    new_content.split_inclusive('\n').map(String::from).collect()
}

/// Write `bytes` to a temp file in the destination's directory, then
/// atomically rename it over the destination.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), WriteError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.persist(path).map_err(|e| WriteError::System(e.error))?;
    Ok(())
}
