//! Sibling backup copies taken before any mutation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::WriteError;

/// Copy `path` byte-for-byte to `<path>.bak` and return the backup path.
///
/// Runs strictly before any mutation; the engine never touches a file
/// without a successful backup when backups are enabled. Permission bits
/// are preserved by `fs::copy`. The returned path is owned by the caller -
/// the engine only removes it again on the verified no-op path.
///
/// # Errors
/// [`WriteError::Backup`] wrapping the underlying I/O error when the source
/// is missing, not a regular file, or the copy fails.
pub fn create_backup<P: AsRef<Path>>(path: P) -> Result<PathBuf, WriteError> {
    let path = path.as_ref();
    let backup_failed = |source: io::Error| WriteError::Backup {
        path: path.to_string_lossy().to_string(),
        source,
    };

    let metadata = fs::metadata(path).map_err(backup_failed)?;
    if !metadata.is_file() {
        return Err(backup_failed(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    let mut backup_path = path.as_os_str().to_owned();
    backup_path.push(".bak");
    let backup_path = PathBuf::from(backup_path);

    fs::copy(path, &backup_path).map_err(backup_failed)?;
    debug!(backup = %backup_path.display(), "backup created");
    Ok(backup_path)
}

/// Remove a backup that turned out to be unnecessary (no-op mutation).
///
/// Failure to remove is logged and swallowed; a stale `.bak` file is not
/// worth failing an otherwise successful no-op over.
pub fn remove_backup(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!(backup = %path.display(), error = %e, "failed to remove unnecessary backup");
    } else {
        debug!(backup = %path.display(), "unnecessary backup removed");
    }
}
