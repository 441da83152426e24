//! Value types for the mutation pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One line replacement inside an atomic edit batch.
///
/// Replaces the inclusive 1-based slice `[line_start, line_end]` with
/// `new_content`, which may span any number of lines; empty content deletes
/// the slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEdit {
    /// First line to replace (1-based).
    pub line_start: usize,
    /// Last line to replace (1-based, inclusive). Must be `>= line_start`.
    pub line_end: usize,
    /// Replacement text; split into lines with terminators preserved.
    pub new_content: String,
}

impl LineEdit {
    /// Convenience constructor.
    #[must_use]
    pub fn new(line_start: usize, line_end: usize, new_content: impl Into<String>) -> Self {
        Self {
            line_start,
            line_end,
            new_content: new_content.into(),
        }
    }
}

/// Result of a successful mutation.
///
/// Failure modes are `WriteError` variants, not fields here; a returned
/// `WriteResult` always means the file is in the reported state. The backup
/// file, when present, belongs to the caller from this point on - the
/// engine does not track it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteResult {
    /// Original lines affected by the mutation (see the engine docs for the
    /// per-operation accounting).
    pub changed_lines: usize,
    /// Path of the pre-mutation backup; `None` when backups were disabled
    /// or the operation was a no-op (the backup is removed again).
    pub backup_path: Option<PathBuf>,
    /// True when the computed content was byte-identical to the original
    /// and nothing was written.
    pub unchanged: bool,
    /// Substitutions performed; populated by string replacement only.
    pub replacements: usize,
    /// Unified diff of the applied change; empty on no-ops.
    pub diff: String,
}

impl WriteResult {
    /// The verified no-op result: nothing written, no backup retained.
    #[must_use]
    pub fn unchanged() -> Self {
        Self {
            changed_lines: 0,
            backup_path: None,
            unchanged: true,
            replacements: 0,
            diff: String::new(),
        }
    }
}
