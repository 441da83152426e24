//! Tests for writer module - line edits and string replacement.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use spiderfs_edit::{FileWriter, LineEdit, WriteError};
use spiderfs_io::{FileError, TextEncoding};

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn bak_of(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(".bak");
    PathBuf::from(s)
}

#[test]
fn test_line_edit_scenario() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "a.txt", "L1\nL2\nL3\nL4\n");
    let writer = FileWriter::default();

    let result = writer
        .apply_line_edits(&path, &[LineEdit::new(2, 3, "X\nY\n")], None)
        .unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "L1\nX\nY\nL4\n");
    assert_eq!(result.changed_lines, 2);
    assert!(!result.unchanged);
    assert!(!result.diff.is_empty());

    // Backup holds the pre-mutation content and is the caller's to keep.
    let backup = result.backup_path.unwrap();
    assert_eq!(backup, bak_of(&path));
    assert_eq!(fs::read_to_string(&backup).unwrap(), "L1\nL2\nL3\nL4\n");
}

#[test]
fn test_identical_edit_is_noop_and_removes_backup() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "a.txt", "L1\nL2\nL3\n");
    let writer = FileWriter::default();

    let result = writer
        .apply_line_edits(&path, &[LineEdit::new(2, 2, "L2\n")], None)
        .unwrap();

    assert!(result.unchanged);
    assert_eq!(result.changed_lines, 0);
    assert!(result.backup_path.is_none());
    assert!(!bak_of(&path).exists());
    assert_eq!(fs::read_to_string(&path).unwrap(), "L1\nL2\nL3\n");
}

#[test]
fn test_line_beyond_eof_leaves_backup_in_place() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "a.txt", "L1\nL2\nL3\nL4\n");
    let writer = FileWriter::default();

    let err = writer
        .apply_line_edits(&path, &[LineEdit::new(10, 10, "X\n")], None)
        .unwrap_err();

    assert!(matches!(err, WriteError::LineBeyondEof { start: 10, total: 4 }));
    // No write occurred; the already-created backup is left behind.
    assert_eq!(fs::read_to_string(&path).unwrap(), "L1\nL2\nL3\nL4\n");
    assert!(bak_of(&path).exists());
}

#[test]
fn test_batch_validation_rejects_before_applying() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "a.txt", "L1\nL2\nL3\n");
    let writer = FileWriter::new(false, TextEncoding::Utf8);

    let err = writer
        .apply_line_edits(&path, &[LineEdit::new(0, 1, "X\n")], None)
        .unwrap_err();
    assert!(matches!(err, WriteError::InvalidLineNumber(0)));

    let err = writer
        .apply_line_edits(&path, &[LineEdit::new(3, 2, "X\n")], None)
        .unwrap_err();
    assert!(matches!(err, WriteError::InvalidLineRange { start: 3, end: 2 }));

    // A bad edit anywhere in the batch means nothing is applied.
    let err = writer
        .apply_line_edits(
            &path,
            &[LineEdit::new(1, 1, "A\n"), LineEdit::new(9, 9, "B\n")],
            None,
        )
        .unwrap_err();
    assert!(matches!(err, WriteError::LineBeyondEof { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), "L1\nL2\nL3\n");
}

#[test]
fn test_batch_applies_bottom_up() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "a.txt", "L1\nL2\nL3\nL4\n");
    let writer = FileWriter::new(false, TextEncoding::Utf8);

    // Given in ascending order; bottom-up application keeps both targets
    // addressed against the original numbering.
    let result = writer
        .apply_line_edits(
            &path,
            &[
                LineEdit::new(1, 1, "A\nB\n"),
                LineEdit::new(4, 4, "D\n"),
            ],
            None,
        )
        .unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "A\nB\nL2\nL3\nD\n");
    assert_eq!(result.changed_lines, 2);
}

#[test]
fn test_empty_content_deletes_lines() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "a.txt", "L1\nL2\nL3\nL4\n");
    let writer = FileWriter::new(false, TextEncoding::Utf8);

    let result = writer
        .apply_line_edits(&path, &[LineEdit::new(2, 3, "")], None)
        .unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "L1\nL4\n");
    assert_eq!(result.changed_lines, 2);
}

#[test]
fn test_edit_end_clipped_to_file_length() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "a.txt", "L1\nL2\nL3\nL4\n");
    let writer = FileWriter::new(false, TextEncoding::Utf8);

    let result = writer
        .apply_line_edits(&path, &[LineEdit::new(3, 99, "Z\n")], None)
        .unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "L1\nL2\nZ\n");
    assert_eq!(result.changed_lines, 2);
}

#[test]
fn test_backups_disabled() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "a.txt", "L1\n");
    let writer = FileWriter::new(false, TextEncoding::Utf8);

    let result = writer
        .apply_line_edits(&path, &[LineEdit::new(1, 1, "X\n")], None)
        .unwrap();

    assert!(result.backup_path.is_none());
    assert!(!bak_of(&path).exists());
}

#[test]
fn test_missing_target() {
    let dir = TempDir::new().unwrap();
    let writer = FileWriter::default();

    let err = writer
        .apply_line_edits(dir.path().join("nope.txt"), &[], None)
        .unwrap_err();
    assert!(matches!(err, WriteError::Io(FileError::NotFound(_))));
}

#[test]
fn test_replace_string_basic() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "a.txt", "foo bar\nbaz foo\n");
    let writer = FileWriter::default();

    let result = writer
        .replace_string(&path, "foo", "qux", 0, None)
        .unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "qux bar\nbaz qux\n");
    assert_eq!(result.replacements, 2);
    assert_eq!(result.changed_lines, 2);
    assert!(result.backup_path.is_some());
}

#[test]
fn test_replace_absent_string_is_noop() {
    let dir = TempDir::new().unwrap();
    let original = "nothing to see\n";
    let path = write_fixture(&dir, "a.txt", original);
    let writer = FileWriter::default();

    let result = writer
        .replace_string(&path, "absent", "present", 0, None)
        .unwrap();

    assert!(result.unchanged);
    assert!(result.backup_path.is_none());
    assert!(!bak_of(&path).exists());
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_replace_round_trip_restores_bytes() {
    let dir = TempDir::new().unwrap();
    let original = "X and X, never overlapping\n";
    let path = write_fixture(&dir, "a.txt", original);
    let writer = FileWriter::new(false, TextEncoding::Utf8);

    writer.replace_string(&path, "X", "Y", 0, None).unwrap();
    writer.replace_string(&path, "Y", "X", 0, None).unwrap();

    assert_eq!(fs::read(&path).unwrap(), original.as_bytes());
}

#[test]
fn test_max_replacements_bounds_substitution() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "a.txt", "a a a a\n");
    let writer = FileWriter::new(false, TextEncoding::Utf8);

    let result = writer.replace_string(&path, "a", "b", 2, None).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "b b a a\n");
    assert_eq!(result.replacements, 2);
}

#[test]
fn test_replace_with_identical_text_is_noop() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "a.txt", "same same\n");
    let writer = FileWriter::default();

    let result = writer.replace_string(&path, "same", "same", 0, None).unwrap();

    assert!(result.unchanged);
    assert!(!bak_of(&path).exists());
}

#[test]
fn test_replace_changed_lines_accounts_for_growth() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "a.txt", "k\nmark\nk\n");
    let writer = FileWriter::new(false, TextEncoding::Utf8);

    // "k" -> "k\nk" grows the file by two lines; the positional diff counts
    // differing positions plus the length delta.
    let result = writer.replace_string(&path, "k", "k\nk", 2, None).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "k\nk\nmark\nk\nk\n");
    assert_eq!(result.replacements, 2);
    assert_eq!(result.changed_lines, 4);
}

#[test]
fn test_latin1_mutation_round_trips_encoding() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("latin.txt");
    fs::write(&path, b"caf\xe9\nplain\n").unwrap();
    let writer = FileWriter::new(false, TextEncoding::Utf8);

    writer
        .replace_string(&path, "plain", "th\u{e9}", 0, Some(TextEncoding::Latin1))
        .unwrap();

    // Written back as Latin-1, not UTF-8.
    assert_eq!(fs::read(&path).unwrap(), b"caf\xe9\nth\xe9\n");
}

#[test]
fn test_write_result_serializes() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "a.txt", "L1\n");
    let writer = FileWriter::new(false, TextEncoding::Utf8);

    let result = writer
        .apply_line_edits(&path, &[LineEdit::new(1, 1, "X\n")], None)
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["changed_lines"], 1);
    assert_eq!(json["unchanged"], false);
}
