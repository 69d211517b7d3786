//! Directory reconciliation for the mirror tree.
//!
//! The single operation here answers one question the mirror engine needs:
//! did this directory exist before the call? A fresh directory means "first
//! backup" (mirror clone); a pre-existing one means "incremental update"
//! (remote update with pruning).

use std::fs::DirBuilder;
#[cfg(unix)]
use std::os::unix::fs::DirBuilderExt;
use std::path::Path;

use crate::errors::Error;

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;

/// Ensures `path` exists as a directory, creating it and any missing parents.
///
/// Created directories get mode `0o770` on Unix (owner/group only; the mode
/// is still subject to the process umask). Returns `true` when the directory
/// was freshly created and `false` when it already existed.
///
/// # Errors
///
/// Returns [`Error::Filesystem`] for any creation failure other than
/// "already exists as a directory" — permission denied, a regular file in
/// the way, disk full. These are not retried; the caller decides whether the
/// failure is fatal for the run or only for one owner.
pub fn ensure_directory(path: &Path) -> Result<bool, Error> {
    if path.is_dir() {
        return Ok(false);
    }

    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o770);

    builder
        .create(path)
        .map(|()| true)
        .map_err(|source| Error::Filesystem {
            path: path.to_path_buf(),
            source,
        })
}
