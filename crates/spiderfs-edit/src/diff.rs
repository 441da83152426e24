//! Diff utilities for mutation reporting.
//!
//! Unified diff output uses the `similar` crate; the changed-line count is
//! a deliberately cheap positional approximation, not a minimal edit
//! distance.

use similar::{ChangeTag, TextDiff};

/// Generate a unified diff between two strings.
///
/// Line-by-line with three lines of context, `+`/`-`/` ` prefixes. Attached
/// to every real mutation as a preview of what was written.
#[must_use]
pub fn unified_diff(original: &str, modified: &str) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push_str("...\n");
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                output.push_str(sign);
                output.push_str(change.value());
                if change.missing_newline() {
                    output.push('\n');
                }
            }
        }
    }

    output
}

/// Positional changed-line count between two texts.
///
/// Counts line indexes where old and new differ, plus the absolute
/// difference in total line counts to account for insertions and deletions.
/// An approximation: a single inserted line near the top counts every
/// shifted line as changed.
#[must_use]
pub fn count_changed_lines(original: &str, modified: &str) -> usize {
    let old_lines: Vec<&str> = original.lines().collect();
    let new_lines: Vec<&str> = modified.lines().collect();

    let positional = old_lines
        .iter()
        .zip(&new_lines)
        .filter(|(old, new)| old != new)
        .count();
    positional + old_lines.len().abs_diff(new_lines.len())
}
